//! Tar collaborators: compressed source reading and destination writing.

pub mod compression;
pub mod detect;
pub mod reader;
pub mod writer;

// Re-export main types for convenience
pub use compression::CompressionCodec;
pub use reader::SourceArchive;
pub use writer::ArchiveSink;
