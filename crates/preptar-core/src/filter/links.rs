//! Link target rewriting and the registry of links seen during a run.

use std::collections::BTreeMap;

use crate::types::EntryKind;
use crate::types::SourceEntry;

/// Rewrites a link target to match the renamed entries.
///
/// Hard link targets name another member of the same archive and carry the
/// same top-level prefix, so the prefix is stripped the way entry names are.
/// A hard link target without `/` is left unchanged. Symbolic link targets
/// are filesystem paths and are returned verbatim.
///
/// # Examples
///
/// ```
/// use preptar_core::EntryKind;
/// use preptar_core::filter::rewrite_link_target;
///
/// assert_eq!(rewrite_link_target(EntryKind::Hardlink, "root/a.txt"), "a.txt");
/// assert_eq!(rewrite_link_target(EntryKind::Symlink, "root/a.txt"), "root/a.txt");
/// ```
#[must_use]
pub fn rewrite_link_target(kind: EntryKind, target: &str) -> &str {
    if kind.is_hardlink() {
        target.split_once('/').map_or(target, |(_, rest)| rest)
    } else {
        target
    }
}

/// Original-name to original-target mappings for every kept link.
///
/// Grows monotonically; an entry is never updated once inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRegistry {
    symbolic: BTreeMap<String, String>,
    hard: BTreeMap<String, String>,
}

impl LinkRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a kept link entry and returns the target to write.
    ///
    /// Returns `None` for entries that are not links. The registry stores
    /// the original, pre-rewrite target.
    pub fn register(&mut self, entry: &SourceEntry) -> Option<String> {
        if !entry.kind.is_link() {
            return None;
        }
        let target = entry.link_target.clone().unwrap_or_default();
        let rewritten = rewrite_link_target(entry.kind, &target).to_owned();
        let map = if entry.kind.is_hardlink() {
            &mut self.hard
        } else {
            &mut self.symbolic
        };
        map.entry(entry.name.clone()).or_insert(target);
        Some(rewritten)
    }

    /// Symbolic links, keyed by original entry name.
    #[must_use]
    pub const fn symbolic(&self) -> &BTreeMap<String, String> {
        &self.symbolic
    }

    /// Hard links, keyed by original entry name.
    #[must_use]
    pub const fn hard(&self) -> &BTreeMap<String, String> {
        &self.hard
    }
}
