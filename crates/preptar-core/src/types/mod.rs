//! Entry types shared by the filter stages.
//!
//! A [`SourceEntry`] is produced once per source member and is never mutated.
//! The classifier and the link rewriter derive a [`RewrittenEntry`] from it,
//! which lives only until it has been appended to the destination.

pub mod entry_type;
pub mod source_entry;

pub use entry_type::EntryKind;
pub use source_entry::EntryDiagnostic;
pub use source_entry::SourceEntry;

/// A kept source entry under its new name.
#[derive(Debug, Clone)]
pub struct RewrittenEntry {
    /// Name with the top-level prefix removed.
    pub name: String,

    /// Link target to write: rewritten for hard links, verbatim for
    /// symbolic links, `None` for everything else.
    pub link_target: Option<String>,

    /// The entry this one was derived from.
    pub source: SourceEntry,
}

impl RewrittenEntry {
    /// Returns the kind of the underlying source entry.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.source.kind
    }
}
