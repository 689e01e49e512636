//! Summary report and progress reporting.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use chrono::DateTime;
use chrono::Local;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::PrepError;
use crate::Result;
use crate::filter::LinkRegistry;
use crate::stats::RunCounters;
use crate::stats::Tally;
use crate::types::SourceEntry;

/// Name of the synthetic entry appended to every destination archive.
pub const SUMMARY_ENTRY_NAME: &str = "preptar.json";

const DATE_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Completion time of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDate {
    /// Seconds since the Unix epoch.
    pub epoch: i64,
    /// Local wall-clock time, `YYYY.MM.DD HH:MM:SS`.
    pub local: String,
    /// UTC wall-clock time, `YYYY.MM.DD HH:MM:SS`.
    #[serde(rename = "UTC")]
    pub utc: String,
}

impl RunDate {
    /// Captures the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_local(Local::now())
    }

    /// Builds the record from a local timestamp.
    #[must_use]
    pub fn from_local(local: DateTime<Local>) -> Self {
        let utc = local.with_timezone(&Utc);
        Self {
            epoch: local.timestamp(),
            local: local.format(DATE_FORMAT).to_string(),
            utc: utc.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Processing time of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Whole seconds from opening the source to writing the summary.
    pub elapse_s: u64,
}

/// Entries dropped by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressedSummary {
    /// Number of suppressed names.
    pub count: usize,
    /// Original names, sorted.
    pub paths: Vec<String>,
}

/// Links kept during the run, keyed by original entry name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSummary {
    /// Hard link name to original target.
    pub hard: BTreeMap<String, String>,
    /// Number of hard links.
    pub hard_count: usize,
    /// Symbolic link name to target.
    pub symbolic: BTreeMap<String, String>,
    /// Number of symbolic links.
    pub symbolic_count: usize,
}

/// Summary of a filtering run.
///
/// Written next to the destination archive as `<destination>.json` and
/// appended inside it as [`SUMMARY_ENTRY_NAME`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Processing time.
    pub conversion: Conversion,
    /// Completion time.
    pub date: RunDate,
    /// Destination-side tally.
    pub destination: Tally,
    /// Kept links.
    pub links: LinkSummary,
    /// Source-side tally.
    pub source: Tally,
    /// Suppressed entries.
    pub suppressed: SuppressedSummary,
}

impl SummaryReport {
    /// Assembles the report from the state accumulated by a run.
    #[must_use]
    pub fn new(
        counters: &RunCounters,
        suppressed: &BTreeSet<String>,
        links: &LinkRegistry,
        elapsed: Duration,
        date: RunDate,
    ) -> Self {
        Self {
            conversion: Conversion {
                elapse_s: elapsed.as_secs(),
            },
            date,
            destination: counters.destination,
            links: LinkSummary {
                hard: links.hard().clone(),
                hard_count: links.hard().len(),
                symbolic: links.symbolic().clone(),
                symbolic_count: links.symbolic().len(),
            },
            source: counters.source,
            suppressed: SuppressedSummary {
                count: suppressed.len(),
                paths: suppressed.iter().cloned().collect(),
            },
        }
    }

    /// Serializes the report with sorted keys and 4-space indentation.
    ///
    /// The output is byte-for-byte stable for equal reports.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>> {
        // `Value` objects are ordered by key.
        let value = serde_json::to_value(self)?;
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut serializer)?;
        Ok(out)
    }

    /// Parses a report previously produced by [`Self::to_canonical_json`].
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(PrepError::Report)
    }
}

/// Callback trait for progress reporting during a filtering run.
///
/// # Examples
///
/// ```
/// use preptar_core::PrepError;
/// use preptar_core::ProgressCallback;
/// use preptar_core::SourceEntry;
/// use preptar_core::SummaryReport;
/// use std::path::Path;
/// use std::time::Duration;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_source_opened(&mut self, path: &Path, elapsed: Duration) {
///         println!("opened {} in {}s", path.display(), elapsed.as_secs());
///     }
///
///     fn on_destination_opened(&mut self, _path: &Path, _elapsed: Duration) {}
///
///     fn on_entry_kept(&mut self, sequence: u64, name: &str, size: u64) {
///         println!("#{sequence} {name} {size}B");
///     }
///
///     fn on_entry_failed(&mut self, entry: &SourceEntry, error: &PrepError) {
///         eprintln!("{error}\n{}", entry.diagnostic());
///     }
///
///     fn on_complete(&mut self, _report: &SummaryReport) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called once the source archive is open and ready to be read.
    fn on_source_opened(&mut self, path: &Path, elapsed: Duration);

    /// Called once the destination archive has been created.
    fn on_destination_opened(&mut self, path: &Path, elapsed: Duration);

    /// Called after each kept entry has been written to the destination.
    ///
    /// # Arguments
    ///
    /// * `sequence` - 1-based position of the entry in the source archive
    /// * `name` - New (stripped) name
    /// * `size` - Size recorded in the source header
    fn on_entry_kept(&mut self, sequence: u64, name: &str, size: u64);

    /// Called when a kept entry is skipped because its content cannot be read.
    fn on_entry_failed(&mut self, entry: &SourceEntry, error: &PrepError);

    /// Called once after the summary has been written.
    fn on_complete(&mut self, report: &SummaryReport);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_source_opened(&mut self, _path: &Path, _elapsed: Duration) {}

    fn on_destination_opened(&mut self, _path: &Path, _elapsed: Duration) {}

    fn on_entry_kept(&mut self, _sequence: u64, _name: &str, _size: u64) {}

    fn on_entry_failed(&mut self, _entry: &SourceEntry, _error: &PrepError) {}

    fn on_complete(&mut self, _report: &SummaryReport) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::EntryKind;
    use chrono::TimeZone;

    fn fixed_date() -> RunDate {
        RunDate {
            epoch: 1_700_000_000,
            local: "2023.11.14 22:13:20".into(),
            utc: "2023.11.14 22:13:20".into(),
        }
    }

    fn sample_report() -> SummaryReport {
        let mut counters = RunCounters::default();
        counters.source.record(EntryKind::File, 10);
        counters.source.record(EntryKind::File, 4);
        counters.destination.record(EntryKind::File, 10);

        let suppressed: BTreeSet<String> = ["root/z.bak", "root/b.orig"]
            .into_iter()
            .map(String::from)
            .collect();

        let mut links = LinkRegistry::new();
        links.register(
            &SourceEntry::new("root/link1", EntryKind::Hardlink).with_link_target("root/a.txt"),
        );

        SummaryReport::new(
            &counters,
            &suppressed,
            &links,
            Duration::from_millis(2_900),
            fixed_date(),
        )
    }

    #[test]
    fn test_report_assembly() {
        let report = sample_report();
        assert_eq!(report.conversion.elapse_s, 2);
        assert_eq!(report.source.total_items, 2);
        assert_eq!(report.destination.total_bytes, 10);
        assert_eq!(report.suppressed.count, 2);
        assert_eq!(report.suppressed.paths, vec!["root/b.orig", "root/z.bak"]);
        assert_eq!(report.links.hard_count, 1);
        assert_eq!(report.links.symbolic_count, 0);
    }

    #[test]
    fn test_canonical_json_layout() {
        let json = String::from_utf8(sample_report().to_canonical_json().unwrap()).unwrap();
        assert!(json.starts_with("{\n    \"conversion\": {\n        \"elapse_s\": 2\n    },"));
        assert!(json.contains("\"UTC\": \"2023.11.14 22:13:20\""));

        let keys = ["conversion", "date", "destination", "links", "source", "suppressed"];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| json.find(&format!("\n    \"{k}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        // "UTC" sorts before lowercase keys
        assert!(json.find("\"UTC\"").unwrap() < json.find("\"epoch\"").unwrap());
        assert!(json.find("\"hard\"").unwrap() < json.find("\"hard_count\"").unwrap());
    }

    #[test]
    fn test_canonical_json_is_deterministic() {
        let report = sample_report();
        assert_eq!(
            report.to_canonical_json().unwrap(),
            report.clone().to_canonical_json().unwrap()
        );
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let parsed = SummaryReport::from_json(&report.to_canonical_json().unwrap()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = SummaryReport::from_json(b"{not json").unwrap_err();
        assert!(matches!(err, PrepError::Report(_)));
    }

    #[test]
    fn test_run_date_format() {
        let local = Local.timestamp_opt(0, 0).unwrap();
        let date = RunDate::from_local(local);
        assert_eq!(date.epoch, 0);
        assert_eq!(date.utc, "1970.01.01 00:00:00");
        assert_eq!(date.local.len(), "1970.01.01 00:00:00".len());
    }

    #[test]
    fn test_noop_progress() {
        let mut progress = NoopProgress;
        progress.on_entry_kept(1, "a.txt", 10);
        progress.on_complete(&sample_report());
    }
}
