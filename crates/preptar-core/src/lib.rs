//! Streaming tar filter that prepares uploaded archives for publishing.
//!
//! `preptar-core` reads a (possibly compressed) tar archive entry by entry
//! and writes a new uncompressed archive in which:
//!
//! - the top-level directory prefix is stripped from every name,
//! - backup leftovers (`*.bak`, `*.orig`) are dropped,
//! - hard link targets are re-anchored to the stripped names,
//! - a `preptar.json` summary report is appended as the final entry.
//!
//! # Examples
//!
//! ```no_run
//! use preptar_core::FilterConfig;
//! use preptar_core::prepare_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = prepare_archive("site.tar.gz", "site.tar", &FilterConfig::default())?;
//! println!("suppressed {} entries", report.suppressed.count);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod engine;
pub mod error;
pub mod filter;
pub mod formats;
pub mod report;
pub mod stats;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::default_destination;
pub use api::filter_stream;
pub use api::prepare_archive;
pub use api::prepare_archive_with_progress;
pub use api::sibling_report_path;
pub use config::FilterConfig;
pub use error::PrepError;
pub use error::Result;
pub use filter::KeepDecision;
pub use filter::LinkRegistry;
pub use filter::classify;
pub use filter::rewrite_link_target;
pub use filter::strip_top_level;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::SUMMARY_ENTRY_NAME;
pub use report::SummaryReport;
pub use stats::RunCounters;
pub use stats::Tally;

// Re-export types module for easier access
pub use types::EntryKind;
pub use types::RewrittenEntry;
pub use types::SourceEntry;
