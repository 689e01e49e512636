//! Line-oriented progress output for the filter command.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressDrawTarget;
use indicatif::ProgressStyle;
use preptar_core::PrepError;
use preptar_core::ProgressCallback;
use preptar_core::SourceEntry;
use preptar_core::SummaryReport;
use std::path::Path;
use std::time::Duration;

/// CLI progress reporter implementing `ProgressCallback`.
///
/// Prints one line per kept entry on stdout and, when stdout is a terminal,
/// keeps a spinner with the running count below them. A skipped entry is
/// reported with its full header dump next to the progress lines; when
/// those are silenced (`--quiet`, `--json`) the dump goes to stderr instead
/// so stdout stays clean.
pub struct ConsoleProgress {
    out: Term,
    err: Term,
    show_lines: bool,
    spinner: Option<ProgressBar>,
    kept: u64,
    failed: u64,
}

impl ConsoleProgress {
    /// Creates a reporter. `show_lines` enables the per-entry lines;
    /// `show_spinner` enables the terminal spinner.
    #[must_use]
    pub fn new(show_lines: bool, show_spinner: bool) -> Self {
        let spinner = show_spinner.then(|| {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {pos} kept {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            show_lines,
            spinner,
            kept: 0,
            failed: 0,
        }
    }

    /// Checks if we should show a spinner (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    /// Prints the source and destination paths of the run.
    pub fn announce(&self, source: &Path, destination: &Path) {
        self.line(&format!("converting:     {}", source.display()));
        self.line(&format!("save result to: {}", destination.display()));
    }

    /// Number of entries skipped because their content could not be read.
    #[must_use]
    pub const fn failed(&self) -> u64 {
        self.failed
    }

    fn line(&self, text: &str) {
        if self.show_lines {
            self.print(text);
        }
    }

    fn dump(&self, text: &str) {
        if self.show_lines {
            self.print(text);
        } else {
            let _ = self.err.write_line(text);
        }
    }

    fn print(&self, text: &str) {
        match &self.spinner {
            Some(bar) => bar.println(text),
            None => {
                let _ = self.out.write_line(text);
            }
        }
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        if let Some(bar) = &self.spinner {
            bar.finish_and_clear();
        }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_source_opened(&mut self, _path: &Path, elapsed: Duration) {
        self.line(&format!("-- open SOURCE in {}s", elapsed.as_secs()));
    }

    fn on_destination_opened(&mut self, _path: &Path, elapsed: Duration) {
        self.line(&format!("-- open DESTINATION in {}s", elapsed.as_secs()));
    }

    fn on_entry_kept(&mut self, sequence: u64, name: &str, size: u64) {
        self.kept += 1;
        self.line(&format_kept(sequence, name, size));
        if let Some(bar) = &self.spinner {
            bar.set_position(self.kept);
            bar.set_message(name.to_string());
        }
    }

    fn on_entry_failed(&mut self, entry: &SourceEntry, error: &PrepError) {
        self.failed += 1;
        self.dump(&format!("skipping {}: {error}", entry.name));
        for line in entry.diagnostic().to_string().lines() {
            self.dump(line);
        }
    }

    fn on_complete(&mut self, _report: &SummaryReport) {
        if let Some(bar) = &self.spinner {
            bar.finish_and_clear();
        }
    }
}

/// Formats the progress line of a kept entry: `#<seq> <name> <size>B`.
fn format_kept(sequence: u64, name: &str, size: u64) -> String {
    format!("#{sequence} {name:32} {size}B")
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
