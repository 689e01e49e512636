//! Read-only view of one source archive member.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::io::Read;

use super::EntryKind;

/// One member of the source archive, as seen by the filter.
///
/// Built from a `tar::Entry` header. The original header is kept alongside
/// the decoded fields so that a kept entry can be re-emitted with the same
/// metadata (mode, ownership, timestamps, device numbers) under a new name.
///
/// # Examples
///
/// ```
/// use preptar_core::EntryKind;
/// use preptar_core::SourceEntry;
///
/// let entry = SourceEntry::new("root/a.txt", EntryKind::File).with_size(10);
/// assert_eq!(entry.name, "root/a.txt");
/// assert_eq!(entry.size, 10);
/// ```
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Full member name, including the top-level container directory.
    pub name: String,

    /// Content size in bytes.
    pub size: u64,

    /// Modification time (seconds since the epoch).
    pub mtime: u64,

    /// Permission bits.
    pub mode: u32,

    /// Member kind.
    pub kind: EntryKind,

    /// Link target, for symbolic and hard links.
    pub link_target: Option<String>,

    /// Numeric owner id.
    pub uid: u64,

    /// Numeric group id.
    pub gid: u64,

    /// Symbolic owner name.
    pub uname: String,

    /// Symbolic group name.
    pub gname: String,

    /// PAX extended header records attached to this member.
    pub extended: BTreeMap<String, Vec<u8>>,

    header: tar::Header,
}

impl SourceEntry {
    /// Creates an entry with a fresh GNU header of the given kind.
    ///
    /// Mostly useful for tests and for feeding the pipeline from something
    /// other than a tar reader.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        let mut header = tar::Header::new_gnu();
        if let Some(ty) = kind.to_tar() {
            header.set_entry_type(ty);
        }
        header.set_mode(if kind.is_directory() { 0o755 } else { 0o644 });
        header.set_size(0);
        Self {
            name: name.into(),
            size: 0,
            mtime: 0,
            mode: if kind.is_directory() { 0o755 } else { 0o644 },
            kind,
            link_target: None,
            uid: 0,
            gid: 0,
            uname: String::new(),
            gname: String::new(),
            extended: BTreeMap::new(),
            header,
        }
    }

    /// Sets the content size.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self.header.set_size(size);
        self
    }

    /// Sets the link target.
    #[must_use]
    pub fn with_link_target(mut self, target: impl Into<String>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    /// Projects a tar reader entry into a `SourceEntry`.
    ///
    /// Long names and PAX `path`/`linkpath` records are already resolved by
    /// the reader. Numeric header fields that fail to parse read as zero;
    /// they are informational only because the raw header is what gets
    /// copied to the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the PAX extended header of the entry is malformed.
    pub fn from_tar<R: Read>(entry: &mut tar::Entry<'_, R>) -> io::Result<Self> {
        let extended = read_extended(entry)?;
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let link_target = entry
            .link_name_bytes()
            .map(|target| String::from_utf8_lossy(&target).into_owned());
        let size = entry.size();
        let header = entry.header();

        Ok(Self {
            name,
            size,
            mtime: header.mtime().unwrap_or_default(),
            mode: header.mode().unwrap_or_default(),
            kind: EntryKind::from(header.entry_type()),
            link_target,
            uid: header.uid().unwrap_or_default(),
            gid: header.gid().unwrap_or_default(),
            uname: lossy(header.username_bytes()),
            gname: lossy(header.groupname_bytes()),
            extended,
            header: header.clone(),
        })
    }

    /// Returns the raw tar header this entry was read from.
    #[must_use]
    pub const fn header(&self) -> &tar::Header {
        &self.header
    }

    /// Returns a multi-line dump of every header field, for diagnostics.
    #[must_use]
    pub const fn diagnostic(&self) -> EntryDiagnostic<'_> {
        EntryDiagnostic(self)
    }
}

fn read_extended<R: Read>(entry: &mut tar::Entry<'_, R>) -> io::Result<BTreeMap<String, Vec<u8>>> {
    let mut extended = BTreeMap::new();
    if let Some(records) = entry.pax_extensions()? {
        for record in records {
            let record = record?;
            let key = String::from_utf8_lossy(record.key_bytes()).into_owned();
            extended.insert(key, record.value_bytes().to_vec());
        }
    }
    Ok(extended)
}

fn lossy(bytes: Option<&[u8]>) -> String {
    bytes
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}

/// Display adapter returned by [`SourceEntry::diagnostic`].
pub struct EntryDiagnostic<'a>(&'a SourceEntry);

impl fmt::Display for EntryDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        let kind = e.kind;
        let type_byte = e.header.entry_type().as_byte();
        let extended: BTreeMap<&str, String> = e
            .extended
            .iter()
            .map(|(k, v)| (k.as_str(), String::from_utf8_lossy(v).into_owned()))
            .collect();

        writeln!(f, "name        : {}", e.name)?;
        writeln!(f, "size        : {}", e.size)?;
        writeln!(f, "mtime       : {}", e.mtime)?;
        writeln!(f, "mode        : {:#o}", e.mode)?;
        writeln!(f, "type        : {}", char::from(type_byte).escape_default())?;
        writeln!(f, "linkname    : {}", e.link_target.as_deref().unwrap_or(""))?;
        writeln!(f, "uid         : {}", e.uid)?;
        writeln!(f, "gid         : {}", e.gid)?;
        writeln!(f, "uname       : {}", e.uname)?;
        writeln!(f, "gname       : {}", e.gname)?;
        writeln!(f, "pax_headers : {extended:?}")?;
        writeln!(f, "isfile : {}", kind.is_file())?;
        writeln!(f, "isdir  : {}", kind.is_directory())?;
        writeln!(f, "issym  : {}", kind.is_symlink())?;
        writeln!(f, "islnk  : {}", kind.is_hardlink())?;
        writeln!(f, "ischr  : {}", kind == EntryKind::CharDevice)?;
        writeln!(f, "isblk  : {}", kind == EntryKind::BlockDevice)?;
        writeln!(f, "isfifo : {}", kind == EntryKind::Fifo)?;
        write!(f, "isdev  : {}", kind.is_device())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;

    fn read_all(data: &[u8]) -> Vec<SourceEntry> {
        let mut archive = tar::Archive::new(data);
        archive
            .entries()
            .unwrap()
            .map(|e| SourceEntry::from_tar(&mut e.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_from_tar_file() {
        let data = TarTestBuilder::new()
            .add_file_with_mode("root/a.txt", b"0123456789", 0o600)
            .build();
        let entries = read_all(&data);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.name, "root/a.txt");
        assert_eq!(entry.size, 10);
        assert_eq!(entry.mode, 0o600);
        assert_eq!(entry.kind, EntryKind::File);
        assert!(entry.link_target.is_none());
    }

    #[test]
    fn test_from_tar_links() {
        let data = TarTestBuilder::new()
            .add_symlink("root/sym", "../outside")
            .add_hardlink("root/hard", "root/a.txt")
            .build();
        let entries = read_all(&data);
        assert_eq!(entries[0].kind, EntryKind::Symlink);
        assert_eq!(entries[0].link_target.as_deref(), Some("../outside"));
        assert_eq!(entries[1].kind, EntryKind::Hardlink);
        assert_eq!(entries[1].link_target.as_deref(), Some("root/a.txt"));
    }

    #[test]
    fn test_from_tar_long_name() {
        let long = format!("root/{}/file.txt", "d".repeat(150));
        let data = TarTestBuilder::new().add_file(&long, b"x").build();
        let entries = read_all(&data);
        assert_eq!(entries[0].name, long);
    }

    #[test]
    fn test_from_tar_extended_attributes() {
        let data = TarTestBuilder::new()
            .add_pax_file("root/x.txt", b"data", &[("SCHILY.xattr.user.tag", b"blue")])
            .build();
        let entries = read_all(&data);
        assert_eq!(
            entries[0].extended.get("SCHILY.xattr.user.tag").map(Vec::as_slice),
            Some(&b"blue"[..])
        );
    }

    #[test]
    fn test_diagnostic_lists_fields() {
        let entry = SourceEntry::new("root/dev", EntryKind::CharDevice);
        let dump = entry.diagnostic().to_string();
        assert!(dump.contains("name        : root/dev"));
        assert!(dump.contains("ischr  : true"));
        assert!(dump.contains("isdev  : true"));
        assert!(dump.contains("isfile : false"));
    }

    #[test]
    fn test_new_sets_header_type() {
        let entry = SourceEntry::new("root/sub/", EntryKind::Directory);
        assert_eq!(entry.header().entry_type(), tar::EntryType::Directory);
        assert_eq!(entry.mode, 0o755);
    }
}
