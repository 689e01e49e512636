//! Staging of entry content before it is appended to the destination.
//!
//! A kept regular file is copied out of the source stream into a spooled
//! buffer first. Only when the full declared size has been read does the
//! destination see the entry, so a failing member never leaves a partial
//! record in the output archive.

use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;

use tempfile::SpooledTempFile;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable copy buffer.
///
/// Allocated once per run and shared by every staging copy.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies data from reader to writer using the provided reusable buffer.
///
/// Returns the total number of bytes copied.
///
/// # Errors
///
/// Returns an error if reading or writing fails. `Interrupted` reads are
/// retried.
///
/// # Examples
///
/// ```
/// use preptar_core::copy::CopyBuffer;
/// use preptar_core::copy::copy_with_buffer;
///
/// let mut buffer = CopyBuffer::new();
/// let mut input = &b"hello"[..];
/// let mut output = Vec::new();
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer)?;
/// assert_eq!(copied, 5);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;
        total += bytes_read as u64;
    }

    Ok(total)
}

/// Entry content that has been fully read and is ready to be appended.
#[derive(Debug)]
pub struct StagedContent {
    spool: SpooledTempFile,
    len: u64,
}

impl StagedContent {
    /// Reads exactly `expected` bytes from `reader` into a spooled buffer.
    ///
    /// Content up to `threshold` bytes stays in memory; larger content rolls
    /// over to an anonymous temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, if spooling to disk fails, or with
    /// `UnexpectedEof` if the reader ends before `expected` bytes.
    pub fn stage<R: Read + ?Sized>(
        reader: &mut R,
        expected: u64,
        threshold: usize,
        buffer: &mut CopyBuffer,
    ) -> io::Result<Self> {
        let mut spool = SpooledTempFile::new(threshold);
        let len = copy_with_buffer(&mut Read::take(reader, expected), &mut spool, buffer)?;
        if len != expected {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short read: expected {expected} bytes, got {len}"),
            ));
        }
        spool.seek(SeekFrom::Start(0))?;
        Ok(Self { spool, len })
    }

    /// Number of staged bytes.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if nothing was staged.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the content spilled over to a temporary file.
    #[must_use]
    pub fn is_on_disk(&self) -> bool {
        self.spool.is_rolled()
    }
}

impl Read for StagedContent {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.spool.read(buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("corrupt segment"))
        }
    }

    #[test]
    fn test_copy_buffer_size() {
        assert_eq!(CopyBuffer::new().size(), 64 * 1024);
        assert_eq!(CopyBuffer::default().size(), 64 * 1024);
    }

    #[test]
    fn test_copy_large_data() {
        let mut buffer = CopyBuffer::new();
        let input_data = vec![0x42u8; 1024 * 1024 + 17];
        let mut input = Cursor::new(&input_data);
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
        assert_eq!(copied, input_data.len() as u64);
        assert_eq!(output, input_data);
    }

    #[test]
    fn test_stage_in_memory() {
        let mut buffer = CopyBuffer::new();
        let mut staged = StagedContent::stage(&mut &b"0123456789"[..], 10, 1024, &mut buffer).unwrap();
        assert_eq!(staged.len(), 10);
        assert!(!staged.is_on_disk());

        let mut out = Vec::new();
        staged.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"0123456789");
    }

    #[test]
    fn test_stage_rolls_over_to_disk() {
        let mut buffer = CopyBuffer::new();
        let data = vec![7u8; 4096];
        let mut staged = StagedContent::stage(&mut data.as_slice(), 4096, 1024, &mut buffer).unwrap();
        assert!(staged.is_on_disk());

        let mut out = Vec::new();
        staged.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_stage_stops_at_expected_size() {
        let mut buffer = CopyBuffer::new();
        let staged = StagedContent::stage(&mut &b"abcdef"[..], 3, 1024, &mut buffer).unwrap();
        assert_eq!(staged.len(), 3);
    }

    #[test]
    fn test_stage_short_read_fails() {
        let mut buffer = CopyBuffer::new();
        let err = StagedContent::stage(&mut &b"abc"[..], 10, 1024, &mut buffer).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_stage_read_error_propagates() {
        let mut buffer = CopyBuffer::new();
        let err = StagedContent::stage(&mut FailingReader, 10, 1024, &mut buffer).unwrap_err();
        assert!(err.to_string().contains("corrupt segment"));
    }

    #[test]
    fn test_stage_empty() {
        let mut buffer = CopyBuffer::new();
        let staged = StagedContent::stage(&mut io::empty(), 0, 1024, &mut buffer).unwrap();
        assert!(staged.is_empty());
    }
}
