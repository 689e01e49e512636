//! Keep/drop decision and name rewriting for a single entry.

use crate::types::SourceEntry;

/// File name suffixes that are never copied to the destination.
const USELESS_FILE_SUFFIXES: [&str; 2] = [".bak", ".orig"];

/// Outcome of classifying one source entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepDecision {
    /// The entry is suppressed.
    Drop(DropReason),
    /// The entry is kept under the given name.
    Keep(String),
}

impl KeepDecision {
    /// Returns `true` if the entry is kept.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }
}

/// Why an entry was suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The name has no `/`: it is the archive's top-level directory marker.
    TopLevel,
    /// Nothing is left after stripping the prefix (`root/`).
    ContainerDirectory,
    /// The entry lives in a folder the filter discards.
    UselessFolder,
    /// The stripped name ends with a discarded suffix.
    UselessFile,
}

/// Strips everything up to and including the first `/`.
///
/// Returns `None` when the name has no `/`.
///
/// # Examples
///
/// ```
/// use preptar_core::filter::strip_top_level;
///
/// assert_eq!(strip_top_level("archive/dir/file.txt"), Some("dir/file.txt"));
/// assert_eq!(strip_top_level("toplevel"), None);
/// ```
#[must_use]
pub fn strip_top_level(name: &str) -> Option<&str> {
    name.split_once('/').map(|(_, rest)| rest)
}

/// Decides whether an entry is kept and computes its new name.
///
/// Pure function of the header; content is never consulted.
///
/// # Examples
///
/// ```
/// use preptar_core::EntryKind;
/// use preptar_core::SourceEntry;
/// use preptar_core::filter::KeepDecision;
/// use preptar_core::filter::classify;
///
/// let entry = SourceEntry::new("archive/dir/file.txt", EntryKind::File);
/// assert_eq!(classify(&entry), KeepDecision::Keep("dir/file.txt".into()));
///
/// let entry = SourceEntry::new("archive/data.bak", EntryKind::File);
/// assert!(!classify(&entry).is_keep());
/// ```
#[must_use]
pub fn classify(entry: &SourceEntry) -> KeepDecision {
    let Some(name) = strip_top_level(&entry.name) else {
        return KeepDecision::Drop(DropReason::TopLevel);
    };
    if name.is_empty() {
        return KeepDecision::Drop(DropReason::ContainerDirectory);
    }
    if is_useless_folder(entry, name) {
        return KeepDecision::Drop(DropReason::UselessFolder);
    }
    if is_useless_file(name) {
        return KeepDecision::Drop(DropReason::UselessFile);
    }
    KeepDecision::Keep(name.to_owned())
}

/// Folder suppression rule. No folder is discarded yet; this is the place
/// where such a rule plugs into [`classify`].
#[must_use]
pub fn is_useless_folder(_entry: &SourceEntry, _stripped_name: &str) -> bool {
    false
}

/// Returns `true` for backup and merge leftovers (`*.bak`, `*.orig`).
///
/// Matching is case-sensitive.
#[must_use]
pub fn is_useless_file(stripped_name: &str) -> bool {
    USELESS_FILE_SUFFIXES
        .iter()
        .any(|suffix| stripped_name.ends_with(suffix))
}
