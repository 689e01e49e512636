//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use preptar_core::SummaryReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Serialize)]
struct FilterOutput<'a> {
    destination: String,
    report_path: String,
    report: &'a SummaryReport,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    warnings: &'a [String],
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn envelope<'a>(
        destination: &Path,
        sibling: &Path,
        report: &'a SummaryReport,
        warnings: &'a [String],
    ) -> JsonOutput<FilterOutput<'a>> {
        let data = FilterOutput {
            destination: destination.display().to_string(),
            report_path: sibling.display().to_string(),
            report,
            warnings,
        };
        if warnings.is_empty() {
            JsonOutput::success("filter", data)
        } else {
            JsonOutput::warning("filter", data)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_filter_result(
        &self,
        destination: &Path,
        sibling: &Path,
        report: &SummaryReport,
        warnings: &[String],
    ) -> Result<()> {
        Self::output(&Self::envelope(destination, sibling, report, warnings))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use preptar_core::LinkRegistry;
    use preptar_core::RunCounters;
    use preptar_core::report::RunDate;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn report() -> SummaryReport {
        SummaryReport::new(
            &RunCounters::default(),
            &BTreeSet::new(),
            &LinkRegistry::default(),
            Duration::ZERO,
            RunDate::now(),
        )
    }

    #[test]
    fn test_envelope_structure() {
        let report = report();
        let output = JsonFormatter::envelope(
            Path::new("out.tar"),
            Path::new("out.tar.json"),
            &report,
            &[],
        );
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["operation"], "filter");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["report_path"], "out.tar.json");
        assert!(value["data"].get("warnings").is_none());
    }

    #[test]
    fn test_warnings_live_inside_the_envelope() {
        let report = report();
        let warnings = vec!["1 entries could not be read".to_string()];
        let output = JsonFormatter::envelope(
            Path::new("out.tar"),
            Path::new("out.tar.json"),
            &report,
            &warnings,
        );
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["status"], "warning");
        assert_eq!(value["data"]["warnings"][0], "1 entries could not be read");
        assert_eq!(value["data"]["report"]["source"]["total_items"], 0);
    }
}
