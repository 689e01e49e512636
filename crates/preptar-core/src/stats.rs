//! Running tallies for the source and destination sides of a run.

use serde::Deserialize;
use serde::Serialize;

use crate::types::EntryKind;

/// Per-side item and byte counts.
///
/// Every recorded item lands in exactly one of `files`, `folders`, `links`
/// or `others`, so `total_items` is always their sum.
///
/// # Examples
///
/// ```
/// use preptar_core::EntryKind;
/// use preptar_core::Tally;
///
/// let mut tally = Tally::default();
/// tally.record(EntryKind::File, 10);
/// tally.record(EntryKind::Directory, 0);
/// assert_eq!(tally.total_items, 2);
/// assert_eq!(tally.total_bytes, 10);
/// assert!(tally.is_consistent());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Regular files.
    pub files: u64,
    /// Directories.
    pub folders: u64,
    /// Symbolic and hard links.
    pub links: u64,
    /// Devices, FIFOs and any other member kind.
    pub others: u64,
    /// Every recorded item.
    pub total_items: u64,
    /// Sum of recorded byte sizes.
    pub total_bytes: u64,
}

impl Tally {
    /// Counts one item of the given kind and adds `bytes` to the byte total.
    pub fn record(&mut self, kind: EntryKind, bytes: u64) {
        self.total_items += 1;
        match kind {
            EntryKind::File => self.files += 1,
            EntryKind::Directory => self.folders += 1,
            EntryKind::Symlink | EntryKind::Hardlink => self.links += 1,
            EntryKind::CharDevice | EntryKind::BlockDevice | EntryKind::Fifo | EntryKind::Other => {
                self.others += 1;
            }
        }
        self.total_bytes = self.total_bytes.saturating_add(bytes);
    }

    /// Returns `true` if `total_items` equals the sum of the categories.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.total_items == self.files + self.folders + self.links + self.others
    }
}

/// Source-side and destination-side tallies of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Every entry read from the source, kept or not.
    pub source: Tally,
    /// Every entry written to the destination (the summary entry excluded).
    pub destination: Tally,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_each_category() {
        let mut tally = Tally::default();
        tally.record(EntryKind::File, 5);
        tally.record(EntryKind::Directory, 0);
        tally.record(EntryKind::Symlink, 0);
        tally.record(EntryKind::Hardlink, 0);
        tally.record(EntryKind::CharDevice, 0);
        tally.record(EntryKind::BlockDevice, 0);
        tally.record(EntryKind::Fifo, 0);
        tally.record(EntryKind::Other, 7);

        assert_eq!(tally.files, 1);
        assert_eq!(tally.folders, 1);
        assert_eq!(tally.links, 2);
        assert_eq!(tally.others, 4);
        assert_eq!(tally.total_items, 8);
        assert_eq!(tally.total_bytes, 12);
        assert!(tally.is_consistent());
    }

    #[test]
    fn test_byte_total_saturates() {
        let mut tally = Tally::default();
        tally.record(EntryKind::File, u64::MAX);
        tally.record(EntryKind::File, 1);
        assert_eq!(tally.total_bytes, u64::MAX);
    }

    #[test]
    fn test_default_counters_are_empty() {
        let counters = RunCounters::default();
        assert_eq!(counters.source, Tally::default());
        assert_eq!(counters.destination.total_items, 0);
    }
}
