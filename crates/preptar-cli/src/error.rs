//! Error conversion utilities for CLI.
//!
//! Converts preptar-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use preptar_core::PrepError;
use std::path::Path;

/// Converts `PrepError` to user-friendly anyhow error with context
pub fn convert_prep_error(err: PrepError, source: &Path) -> anyhow::Error {
    match err {
        PrepError::SourceOpen { path, source: io } => {
            anyhow!(
                "Cannot open source archive '{}': {}\n\
                 HINT: Check that the file exists and is readable.",
                path.display(),
                io
            )
        }
        PrepError::DestinationOpen { path, source: io } => {
            anyhow!(
                "Cannot create destination archive '{}': {}\n\
                 HINT: Check that the parent directory exists and is writable.",
                path.display(),
                io
            )
        }
        PrepError::ReportWrite { path, source: io } => {
            anyhow!(
                "Cannot write summary report '{}': {}\n\
                 HINT: Check that the path is a writable location and not a directory.",
                path.display(),
                io
            )
        }
        PrepError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: Supported sources are tar, tar.gz, tar.bz2, tar.xz and tar.zst.",
                source.display(),
                reason
            )
        }
        PrepError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                source.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", source.display())),
    }
}

/// Adds context to a core result about the archive being processed
pub fn add_archive_context<T>(
    result: Result<T, PrepError>,
    source: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_prep_error(e, source))
}
