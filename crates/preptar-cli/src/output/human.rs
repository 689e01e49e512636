//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use preptar_core::SummaryReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    /// Warnings go to stderr even under `--quiet`.
    fn format_warning(&self, message: &str) {
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {}", style("⚠").yellow().bold(), message));
        } else {
            let _ = term.write_line(&format!("Warning: {message}"));
        }
    }

    fn summary_lines(&self, sibling: &Path, report: &SummaryReport) -> Vec<String> {
        let src = &report.source;
        let dst = &report.destination;
        let mut lines = vec![
            format!(
                "  Source:      {} items ({})",
                Self::format_number(src.total_items),
                humanize_bytes(src.total_bytes)
            ),
            format!(
                "  Kept:        {} items ({})",
                Self::format_number(dst.total_items),
                humanize_bytes(dst.total_bytes)
            ),
            format!(
                "  Suppressed:  {}",
                Self::format_number(report.suppressed.count as u64)
            ),
            format!(
                "  Links:       {} hard, {} symbolic",
                report.links.hard_count, report.links.symbolic_count
            ),
            format!("  Elapsed:     {}s", report.conversion.elapse_s),
            format!("  Report:      {}", sibling.display()),
        ];

        if self.verbose {
            lines.push(format!(
                "  Files/folders/links/others: {}/{}/{}/{}",
                dst.files, dst.folders, dst.links, dst.others
            ));
            lines.push(format!("  Finished:    {} (UTC {})", report.date.local, report.date.utc));
            for path in &report.suppressed.paths {
                lines.push(format!("  - {path}"));
            }
        }

        lines
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_filter_result(
        &self,
        destination: &Path,
        sibling: &Path,
        report: &SummaryReport,
        warnings: &[String],
    ) -> Result<()> {
        for warning in warnings {
            self.format_warning(warning);
        }

        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Archive prepared: {}",
                style("✓").green().bold(),
                destination.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Archive prepared: {}", destination.display()));
        }

        for line in self.summary_lines(sibling, report) {
            let _ = self.term.write_line(&line);
        }

        Ok(())
    }
}
