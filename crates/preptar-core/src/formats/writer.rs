//! Destination archive writing.

use std::io;
use std::io::Write;

use tar::Builder;
use tar::EntryType;
use tar::Header;

use crate::copy::StagedContent;
use crate::types::RewrittenEntry;

/// PAX records regenerated by the writer rather than copied from the source.
fn is_forwarded_pax_key(key: &str) -> bool {
    !matches!(key, "path" | "linkpath" | "size") && !key.starts_with("GNU.sparse.")
}

/// Uncompressed tar writer for rewritten entries.
///
/// Entries are appended in call order; [`ArchiveSink::finish`] writes the
/// end-of-archive marker and hands back the inner writer.
pub struct ArchiveSink<W: Write> {
    builder: Builder<W>,
    entries_written: u64,
}

impl<W: Write> ArchiveSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        let mut builder = Builder::new(writer);
        builder.follow_symlinks(false);
        Self {
            builder,
            entries_written: 0,
        }
    }

    /// Appends a rewritten entry with its staged content, if any.
    ///
    /// The source header is reused so mode, ownership, timestamps and
    /// device numbers carry over. Entries without content are written with
    /// a zero size. Forwarded PAX records precede the entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or link target cannot be encoded, or if
    /// writing fails.
    pub fn append(
        &mut self,
        entry: &RewrittenEntry,
        content: Option<StagedContent>,
    ) -> io::Result<()> {
        let extended: Vec<(&str, &[u8])> = entry
            .source
            .extended
            .iter()
            .filter(|(key, _)| is_forwarded_pax_key(key))
            .map(|(key, value)| (key.as_str(), value.as_slice()))
            .collect();
        if !extended.is_empty() {
            self.builder.append_pax_extensions(extended)?;
        }

        let mut header = entry.source.header().clone();
        match (content, entry.link_target.as_deref()) {
            (Some(content), _) => {
                if header.entry_type() == EntryType::GNUSparse {
                    header.set_entry_type(EntryType::Regular);
                }
                header.set_size(content.len());
                self.builder.append_data(&mut header, &entry.name, content)?;
            }
            (None, Some(target)) => {
                header.set_size(0);
                self.builder.append_link(&mut header, &entry.name, target)?;
            }
            (None, None) => {
                header.set_size(0);
                self.builder
                    .append_data(&mut header, &entry.name, io::empty())?;
            }
        }

        self.entries_written += 1;
        Ok(())
    }

    /// Appends the summary report as a regular file named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn append_summary(&mut self, name: &str, json: &[u8], mtime: u64) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(json.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        self.builder.append_data(&mut header, name, json)?;
        self.entries_written += 1;
        Ok(())
    }

    /// Number of entries appended so far, summary included.
    #[must_use]
    pub const fn entries_written(&self) -> u64 {
        self.entries_written
    }

    /// Writes the end-of-archive marker and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailing blocks cannot be written.
    pub fn finish(self) -> io::Result<W> {
        self.builder.into_inner()
    }
}
