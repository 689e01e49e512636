//! Runtime configuration for archive filtering.

/// Default capacity of the buffered source reader (4 MiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Default capacity of the buffered destination writer.
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 1_024_000;

/// Default in-memory staging limit for entry content (16 MiB).
pub const DEFAULT_SPOOL_THRESHOLD: usize = 16 * 1024 * 1024;

/// I/O tuning for a filtering run.
///
/// The keep/drop rules are fixed; this struct only controls how the source
/// and destination archives are buffered and how entry content is staged
/// before it is appended to the destination.
///
/// # Examples
///
/// ```
/// use preptar_core::FilterConfig;
///
/// let config = FilterConfig::default()
///     .with_read_buffer_size(64 * 1024 * 1024)
///     .with_spool_threshold(1024 * 1024);
/// assert_eq!(config.spool_threshold, 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Capacity of the buffered reader wrapped around the source file.
    pub read_buffer_size: usize,

    /// Capacity of the buffered writer wrapped around the destination file.
    pub write_buffer_size: usize,

    /// Content up to this many bytes is staged in memory; larger content
    /// spills to an anonymous temporary file.
    pub spool_threshold: usize,
}

impl Default for FilterConfig {
    /// Default values:
    /// - `read_buffer_size`: 4 MiB
    /// - `write_buffer_size`: 1,024,000 bytes
    /// - `spool_threshold`: 16 MiB
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
            spool_threshold: DEFAULT_SPOOL_THRESHOLD,
        }
    }
}

impl FilterConfig {
    /// Sets the source read buffer capacity. Zero falls back to the default.
    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = non_zero_or(size, DEFAULT_READ_BUFFER_SIZE);
        self
    }

    /// Sets the destination write buffer capacity. Zero falls back to the
    /// default.
    #[must_use]
    pub fn with_write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = non_zero_or(size, DEFAULT_WRITE_BUFFER_SIZE);
        self
    }

    /// Sets the in-memory staging limit. Zero stages everything on disk.
    #[must_use]
    pub fn with_spool_threshold(mut self, threshold: usize) -> Self {
        self.spool_threshold = threshold;
        self
    }
}

fn non_zero_or(value: usize, fallback: usize) -> usize {
    if value == 0 { fallback } else { value }
}
