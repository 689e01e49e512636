//! Error types for archive filtering operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PrepError`.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Errors that can occur while filtering an archive.
#[derive(Error, Debug)]
pub enum PrepError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source archive could not be opened for reading.
    #[error("cannot open source archive {path}: {source}")]
    SourceOpen {
        /// Path of the source archive.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The destination archive could not be created.
    #[error("cannot open destination archive {path}: {source}")]
    DestinationOpen {
        /// Path of the destination archive.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A header of the source archive could not be read.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// The content of a single kept entry could not be obtained.
    #[error("cannot read content of {name}: {source}")]
    EntryContent {
        /// Original (pre-rewrite) name of the entry.
        name: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The sibling summary file next to the destination could not be written.
    #[error("cannot write summary report {path}: {source}")]
    ReportWrite {
        /// Path of the sibling report.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The summary report could not be serialized.
    #[error("cannot serialize summary report: {0}")]
    Report(#[from] serde_json::Error),
}

impl PrepError {
    /// Returns `true` if the run may continue after this error.
    ///
    /// Only a per-entry content failure is recoverable: the entry is skipped
    /// and the loop moves on to the next source entry. Everything else aborts
    /// the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use preptar_core::PrepError;
    ///
    /// let err = PrepError::EntryContent {
    ///     name: "root/a.txt".into(),
    ///     source: std::io::Error::other("boom"),
    /// };
    /// assert!(err.is_recoverable());
    ///
    /// let err = PrepError::InvalidArchive("bad header".into());
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::EntryContent { .. })
    }
}
