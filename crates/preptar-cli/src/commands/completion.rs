//! Shell completion generation command.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;
use std::io::Write;

const BIN_NAME: &str = "preptar";

/// Writes completions for `shell` to standard output.
pub fn execute(shell: Shell) {
    generate(shell, &mut io::stdout());
}

fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_mention_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let mut out = Vec::new();
            generate(shell, &mut out);
            let script = String::from_utf8_lossy(&out);
            assert!(script.contains(BIN_NAME), "{shell:?}");
            assert!(script.contains("filter"), "{shell:?}");
        }
    }

    #[test]
    fn test_completions_for_every_shell() {
        for shell in [Shell::PowerShell, Shell::Elvish] {
            let mut out = Vec::new();
            generate(shell, &mut out);
            assert!(!out.is_empty(), "{shell:?}");
        }
    }
}
