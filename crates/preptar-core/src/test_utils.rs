//! Test utilities for building in-memory source archives.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

/// Builder for creating TAR test archives with various entry types.
///
/// Supports files, directories, symlinks, hardlinks, devices, FIFOs and
/// files carrying PAX extended attributes.
///
/// # Examples
///
/// ```
/// use preptar_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("root/file.txt", b"content")
///     .add_directory("root/dir/")
///     .add_symlink("root/link", "file.txt")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    fn append(mut self, mut header: tar::Header, path: &str, data: &[u8]) -> Self {
        header.set_size(data.len() as u64);
        header.set_mtime(1_700_000_000);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    fn header(kind: tar::EntryType, mode: u32) -> tar::Header {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(kind);
        header.set_mode(mode);
        header
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with custom mode.
    #[must_use]
    pub fn add_file_with_mode(self, path: &str, data: &[u8], mode: u32) -> Self {
        self.append(Self::header(tar::EntryType::Regular, mode), path, data)
    }

    /// Adds a regular file preceded by a PAX extended header.
    #[must_use]
    pub fn add_pax_file(mut self, path: &str, data: &[u8], records: &[(&str, &[u8])]) -> Self {
        self.builder
            .append_pax_extensions(records.iter().copied())
            .unwrap();
        self.add_file(path, data)
    }

    /// Adds a `pax_global_header` entry the way `git archive` emits one.
    #[must_use]
    pub fn add_pax_global_header(self, records: &[(&str, &str)]) -> Self {
        let data: Vec<u8> = records
            .iter()
            .flat_map(|(key, value)| pax_record(key, value))
            .collect();
        self.append(
            Self::header(tar::EntryType::XGlobalHeader, 0o666),
            "pax_global_header",
            &data,
        )
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.append(Self::header(tar::EntryType::Directory, 0o755), path, &[])
    }

    /// Adds a symlink to the archive.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        let mut header = Self::header(tar::EntryType::Symlink, 0o777);
        header.set_link_name(target).unwrap();
        self.append(header, path, &[])
    }

    /// Adds a hardlink to the archive.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        let mut header = Self::header(tar::EntryType::Link, 0o644);
        header.set_link_name(target).unwrap();
        self.append(header, path, &[])
    }

    /// Adds a character device node to the archive.
    #[must_use]
    pub fn add_char_device(self, path: &str, major: u32, minor: u32) -> Self {
        let mut header = Self::header(tar::EntryType::Char, 0o666);
        header.set_device_major(major).unwrap();
        header.set_device_minor(minor).unwrap();
        self.append(header, path, &[])
    }

    /// Adds a FIFO to the archive.
    #[must_use]
    pub fn add_fifo(self, path: &str) -> Self {
        self.append(Self::header(tar::EntryType::Fifo, 0o644), path, &[])
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes one `<len> <key>=<value>\n` record; `<len>` counts itself.
fn pax_record(key: &str, value: &str) -> Vec<u8> {
    let rest = key.len() + value.len() + 3;
    let mut len = rest;
    loop {
        let total = rest + len.to_string().len();
        if total == len {
            break;
        }
        len = total;
    }
    format!("{len} {key}={value}\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pax_record_length_counts_itself() {
        assert_eq!(pax_record("comment", "abcdef"), b"18 comment=abcdef\n");
        assert_eq!(pax_record("k", "v"), b"6 k=v\n");
    }

    #[test]
    fn test_pax_global_header_entry() {
        let tar_data = TarTestBuilder::new()
            .add_pax_global_header(&[("comment", "0123abcd")])
            .add_file("root/file.txt", b"hello")
            .build();
        let mut archive = tar::Archive::new(tar_data.as_slice());
        let types: Vec<tar::EntryType> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().header().entry_type())
            .collect();
        assert_eq!(types, [tar::EntryType::XGlobalHeader, tar::EntryType::Regular]);
    }

    #[test]
    fn test_tar_builder_entry_types() {
        let tar_data = TarTestBuilder::new()
            .add_file("root/file.txt", b"content")
            .add_directory("root/dir/")
            .add_char_device("root/null", 1, 3)
            .add_fifo("root/pipe")
            .build();

        let mut archive = tar::Archive::new(tar_data.as_slice());
        let types: Vec<tar::EntryType> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().header().entry_type())
            .collect();
        assert_eq!(
            types,
            [
                tar::EntryType::Regular,
                tar::EntryType::Directory,
                tar::EntryType::Char,
                tar::EntryType::Fifo,
            ]
        );
    }
}
