//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "preptar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Strip the top-level directory and backup files from a tar archive
    Filter(FilterArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct FilterArgs {
    /// Source archive (plain, gzip, bzip2, xz or zstd compressed tar)
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination archive (default: <source stem>.tar in the current directory)
    #[arg(value_name = "DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Overwrite the destination if it exists
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Source read buffer size (e.g. 4M)
    #[arg(long, value_name = "SIZE", value_parser = parse_byte_size)]
    pub read_buffer: Option<u64>,

    /// Destination write buffer size (e.g. 1000K)
    #[arg(long, value_name = "SIZE", value_parser = parse_byte_size)]
    pub write_buffer: Option<u64>,

    /// Entries larger than this are staged on disk instead of in memory
    #[arg(long, value_name = "SIZE", value_parser = parse_byte_size)]
    pub spool_threshold: Option<u64>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
