//! Archive entry kind enumeration.

/// Kind of a member found in a tar archive.
///
/// The tar header type byte is folded into the categories the filter counts:
/// regular files, directories, links and everything else.
///
/// # Examples
///
/// ```
/// use preptar_core::EntryKind;
///
/// let kind = EntryKind::from(tar::EntryType::Link);
/// assert!(kind.is_hardlink());
/// assert!(kind.is_link());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file, including contiguous and GNU sparse members.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    Symlink,

    /// Hard link entry.
    Hardlink,

    /// Character device node.
    CharDevice,

    /// Block device node.
    BlockDevice,

    /// Named pipe.
    Fifo,

    /// Any other header type (volume labels, vendor extensions, ...).
    Other,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symlink.
    #[must_use]
    pub const fn is_symlink(self) -> bool {
        matches!(self, Self::Symlink)
    }

    /// Returns `true` if this is a hardlink.
    #[must_use]
    pub const fn is_hardlink(self) -> bool {
        matches!(self, Self::Hardlink)
    }

    /// Returns `true` for both symbolic and hard links.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Symlink | Self::Hardlink)
    }

    /// Returns `true` for character devices, block devices and FIFOs.
    #[must_use]
    pub const fn is_device(self) -> bool {
        matches!(self, Self::CharDevice | Self::BlockDevice | Self::Fifo)
    }

    /// Returns the tar header type this kind is written as, if it has one.
    #[must_use]
    pub const fn to_tar(self) -> Option<tar::EntryType> {
        match self {
            Self::File => Some(tar::EntryType::Regular),
            Self::Directory => Some(tar::EntryType::Directory),
            Self::Symlink => Some(tar::EntryType::Symlink),
            Self::Hardlink => Some(tar::EntryType::Link),
            Self::CharDevice => Some(tar::EntryType::Char),
            Self::BlockDevice => Some(tar::EntryType::Block),
            Self::Fifo => Some(tar::EntryType::Fifo),
            Self::Other => None,
        }
    }
}

impl From<tar::EntryType> for EntryKind {
    fn from(value: tar::EntryType) -> Self {
        match value {
            tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
                Self::File
            }
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Symlink => Self::Symlink,
            tar::EntryType::Link => Self::Hardlink,
            tar::EntryType::Char => Self::CharDevice,
            tar::EntryType::Block => Self::BlockDevice,
            tar::EntryType::Fifo => Self::Fifo,
            _ => Self::Other,
        }
    }
}
