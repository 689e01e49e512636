//! The filtering loop.
//!
//! [`Pipeline`] reads source entries in order, asks the classifier whether to
//! keep each one, stages kept content and appends the rewritten entry to an
//! [`ArchiveSink`]. Every counter, the suppressed set and the link registry
//! live in one [`Aggregator`] owned by the pipeline.

use std::collections::BTreeSet;
use std::io;
use std::io::Read;
use std::io::Write;
use std::time::Duration;

use tracing::debug;
use tracing::warn;

use crate::FilterConfig;
use crate::PrepError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::StagedContent;
use crate::filter::KeepDecision;
use crate::filter::LinkRegistry;
use crate::filter::classify;
use crate::filter::rewrite;
use crate::formats::ArchiveSink;
use crate::report::ProgressCallback;
use crate::report::RunDate;
use crate::report::SUMMARY_ENTRY_NAME;
use crate::report::SummaryReport;
use crate::stats::RunCounters;
use crate::types::EntryKind;
use crate::types::RewrittenEntry;
use crate::types::SourceEntry;

/// Run state: tallies, suppressed names and kept links.
#[derive(Debug, Default)]
pub struct Aggregator {
    counters: RunCounters,
    suppressed: BTreeSet<String>,
    links: LinkRegistry,
}

impl Aggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a source entry and returns its 1-based sequence number.
    pub fn observe(&mut self, entry: &SourceEntry) -> u64 {
        self.counters.source.record(entry.kind, entry.size);
        self.counters.source.total_items
    }

    /// Records a dropped entry by its original name.
    pub fn suppress(&mut self, name: String) {
        self.suppressed.insert(name);
    }

    /// Renames a kept entry and registers it if it is a link.
    pub fn rewrite(&mut self, entry: SourceEntry, new_name: String) -> RewrittenEntry {
        rewrite(entry, new_name, &mut self.links)
    }

    /// Counts an entry written to the destination.
    ///
    /// `content_bytes` is the staged content length; entries without content
    /// pass zero.
    pub fn record_written(&mut self, kind: EntryKind, content_bytes: u64) {
        self.counters.destination.record(kind, content_bytes);
    }

    /// Source and destination tallies so far.
    #[must_use]
    pub const fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Suppressed original names so far.
    #[must_use]
    pub const fn suppressed(&self) -> &BTreeSet<String> {
        &self.suppressed
    }

    /// Kept links so far.
    #[must_use]
    pub const fn links(&self) -> &LinkRegistry {
        &self.links
    }

    /// Builds the summary report from the current state.
    #[must_use]
    pub fn summarize(&self, elapsed: Duration, date: RunDate) -> SummaryReport {
        SummaryReport::new(
            &self.counters,
            &self.suppressed,
            &self.links,
            elapsed,
            date,
        )
    }
}

/// Sequential source-to-destination filter.
///
/// # Examples
///
/// ```
/// use preptar_core::FilterConfig;
/// use preptar_core::NoopProgress;
/// use preptar_core::engine::Pipeline;
///
/// # fn main() -> preptar_core::Result<()> {
/// let mut progress = NoopProgress;
/// let config = FilterConfig::default();
/// let mut source = tar::Archive::new(&[0u8; 1024][..]);
///
/// let mut pipeline = Pipeline::new(Vec::new(), &config, &mut progress);
/// pipeline.consume(&mut source)?;
/// assert_eq!(pipeline.aggregator().counters().source.total_items, 0);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<'p, W: Write> {
    sink: ArchiveSink<W>,
    aggregator: Aggregator,
    buffer: CopyBuffer,
    spool_threshold: usize,
    progress: &'p mut dyn ProgressCallback,
    /// Set when the last entry was skipped because the stream ended inside
    /// its content.
    source_truncated: bool,
}

impl<'p, W: Write> Pipeline<'p, W> {
    /// Creates a pipeline writing a plain tar stream to `writer`.
    pub fn new(writer: W, config: &FilterConfig, progress: &'p mut dyn ProgressCallback) -> Self {
        Self {
            sink: ArchiveSink::new(writer),
            aggregator: Aggregator::new(),
            buffer: CopyBuffer::new(),
            spool_threshold: config.spool_threshold,
            progress,
            source_truncated: false,
        }
    }

    /// Processes every entry of `archive` in order.
    ///
    /// PAX global headers carry no member of their own and are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::InvalidArchive`] if an entry header cannot be
    /// read, or an I/O error if writing the destination fails. A kept entry
    /// whose content cannot be read is reported and skipped; if the source
    /// ends inside that entry, the run stops there without an error.
    pub fn consume<R: Read>(&mut self, archive: &mut tar::Archive<R>) -> Result<()> {
        let entries = archive
            .entries()
            .map_err(|e| PrepError::InvalidArchive(format!("cannot iterate entries: {e}")))?;

        for entry in entries {
            let mut entry = match entry {
                Ok(entry) => entry,
                Err(e) if self.source_truncated => {
                    warn!(error = %e, "source ends inside a skipped entry");
                    break;
                }
                Err(e) => {
                    return Err(PrepError::InvalidArchive(format!(
                        "corrupt entry header: {e}"
                    )));
                }
            };
            if entry.header().entry_type().is_pax_global_extensions() {
                debug!("ignoring pax global header");
                continue;
            }
            let source = SourceEntry::from_tar(&mut entry)
                .map_err(|e| PrepError::InvalidArchive(format!("corrupt extended header: {e}")))?;
            self.process_entry(source, &mut entry)?;
        }

        Ok(())
    }

    /// Processes one source entry whose content, if any, is read from
    /// `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if appending to the destination fails.
    pub fn process_entry<R: Read + ?Sized>(
        &mut self,
        entry: SourceEntry,
        content: &mut R,
    ) -> Result<()> {
        self.source_truncated = false;
        let sequence = self.aggregator.observe(&entry);

        let new_name = match classify(&entry) {
            KeepDecision::Drop(reason) => {
                debug!(name = %entry.name, ?reason, "entry suppressed");
                self.aggregator.suppress(entry.name);
                return Ok(());
            }
            KeepDecision::Keep(name) => name,
        };

        let staged = if entry.kind.is_file() {
            match self.stage(&entry, content) {
                Ok(staged) => Some(staged),
                Err(error) if error.is_recoverable() => {
                    warn!(
                        name = %entry.name,
                        size = entry.size,
                        mode = entry.mode,
                        kind = ?entry.kind,
                        %error,
                        "skipping entry with unreadable content"
                    );
                    self.progress.on_entry_failed(&entry, &error);
                    return Ok(());
                }
                Err(error) => return Err(error),
            }
        } else {
            None
        };

        let content_bytes = staged.as_ref().map_or(0, StagedContent::len);
        let spilled = staged.as_ref().is_some_and(StagedContent::is_on_disk);
        let rewritten = self.aggregator.rewrite(entry, new_name);

        self.sink.append(&rewritten, staged)?;
        self.aggregator
            .record_written(rewritten.kind(), content_bytes);

        debug!(
            sequence,
            name = %rewritten.name,
            size = rewritten.source.size,
            spilled,
            "entry kept"
        );
        self.progress
            .on_entry_kept(sequence, &rewritten.name, rewritten.source.size);
        Ok(())
    }

    fn stage<R: Read + ?Sized>(
        &mut self,
        entry: &SourceEntry,
        content: &mut R,
    ) -> Result<StagedContent> {
        StagedContent::stage(content, entry.size, self.spool_threshold, &mut self.buffer).map_err(
            |source| {
                self.source_truncated = source.kind() == io::ErrorKind::UnexpectedEof;
                PrepError::EntryContent {
                    name: entry.name.clone(),
                    source,
                }
            },
        )
    }

    /// Returns the run state.
    #[must_use]
    pub const fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Builds the summary report from the current state.
    #[must_use]
    pub fn summarize(&self, elapsed: Duration, date: RunDate) -> SummaryReport {
        self.aggregator.summarize(elapsed, date)
    }

    /// Appends the serialized summary as the final entry and finalizes the
    /// destination stream.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the summary or the archive trailer fails.
    pub fn finish(mut self, summary_json: &[u8], mtime: u64) -> Result<W> {
        self.sink
            .append_summary(SUMMARY_ENTRY_NAME, summary_json, mtime)?;
        debug!(entries = self.sink.entries_written(), "destination finalized");
        Ok(self.sink.finish()?)
    }
}
