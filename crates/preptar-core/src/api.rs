//! High-level public API for preparing archives.

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::FilterConfig;
use crate::PrepError;
use crate::Result;
use crate::engine::Pipeline;
use crate::formats::CompressionCodec;
use crate::formats::SourceArchive;
use crate::formats::compression::decoder;
use crate::formats::detect::sniff;
use crate::report::NoopProgress;
use crate::report::ProgressCallback;
use crate::report::RunDate;
use crate::report::SummaryReport;

/// Filters `source` into a new uncompressed archive at `destination`.
///
/// Every entry loses its top-level directory prefix, backup leftovers are
/// dropped, hard link targets are re-anchored and a summary report is
/// appended as `preptar.json`. The same report is written next to the
/// destination as `<destination>.json`.
///
/// # Errors
///
/// Returns an error if:
/// - The source cannot be opened or is not a readable tar stream
/// - The destination or its sibling report cannot be written
///
/// A kept entry whose content cannot be read is skipped, not an error.
///
/// # Examples
///
/// ```no_run
/// use preptar_core::FilterConfig;
/// use preptar_core::prepare_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = prepare_archive("upload.tar.gz", "upload.tar", &FilterConfig::default())?;
/// println!("kept {} of {} entries", report.destination.total_items, report.source.total_items);
/// # Ok(())
/// # }
/// ```
pub fn prepare_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    config: &FilterConfig,
) -> Result<SummaryReport> {
    prepare_archive_with_progress(source, destination, config, &mut NoopProgress)
}

/// Like [`prepare_archive`], reporting progress through `progress`.
///
/// # Errors
///
/// See [`prepare_archive`].
pub fn prepare_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    config: &FilterConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<SummaryReport> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    info!(source = %source.display(), destination = %destination.display(), "converting");

    let started = Instant::now();
    let mut archive = SourceArchive::open(source, config)?;
    let elapsed = started.elapsed();
    info!(
        codec = archive.codec().map_or("none", CompressionCodec::name),
        ?elapsed,
        "source opened"
    );
    progress.on_source_opened(source, elapsed);

    let opening = Instant::now();
    let file = File::create(destination).map_err(|e| PrepError::DestinationOpen {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let writer = BufWriter::with_capacity(config.write_buffer_size, file);
    let elapsed = opening.elapsed();
    info!(?elapsed, "destination opened");
    progress.on_destination_opened(destination, elapsed);

    let sibling = sibling_report_path(destination);
    let (report, writer) = run(
        archive.archive_mut(),
        writer,
        config,
        progress,
        started,
        Some(&sibling),
    )?;
    writer.into_inner().map_err(|e| e.into_error())?;

    info!(
        kept = report.destination.total_items,
        suppressed = report.suppressed.count,
        elapse_s = report.conversion.elapse_s,
        "conversion complete"
    );
    progress.on_complete(&report);
    Ok(report)
}

/// Filters a tar stream from `reader` into `writer`.
///
/// Compressed input is detected and decoded. No sibling report is written;
/// the summary is only appended to the output stream and returned.
///
/// # Errors
///
/// Returns an error if the input is not a readable tar stream or writing the
/// output fails.
///
/// # Examples
///
/// ```
/// use preptar_core::FilterConfig;
/// use preptar_core::NoopProgress;
/// use preptar_core::filter_stream;
///
/// # fn main() -> preptar_core::Result<()> {
/// let mut builder = tar::Builder::new(Vec::new());
/// let mut header = tar::Header::new_gnu();
/// header.set_size(5);
/// builder.append_data(&mut header, "root/hello.txt", &b"hello"[..])?;
/// let source = builder.into_inner()?;
///
/// let (report, output) = filter_stream(
///     source.as_slice(),
///     Vec::new(),
///     &FilterConfig::default(),
///     &mut NoopProgress,
/// )?;
/// assert_eq!(report.destination.files, 1);
/// assert!(!output.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn filter_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &FilterConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<(SummaryReport, W)> {
    let started = Instant::now();
    let mut reader = BufReader::with_capacity(config.read_buffer_size, reader);
    let codec = sniff(&mut reader)?;
    let mut archive = tar::Archive::new(decoder(codec, reader)?);

    let (report, writer) = run(&mut archive, writer, config, progress, started, None)?;
    progress.on_complete(&report);
    Ok((report, writer))
}

fn run<R: Read, W: Write>(
    archive: &mut tar::Archive<R>,
    writer: W,
    config: &FilterConfig,
    progress: &mut dyn ProgressCallback,
    started: Instant,
    sibling: Option<&Path>,
) -> Result<(SummaryReport, W)> {
    let mut pipeline = Pipeline::new(writer, config, progress);
    pipeline.consume(archive)?;

    let report = pipeline.summarize(started.elapsed(), RunDate::now());
    let json = report.to_canonical_json()?;
    if let Some(path) = sibling {
        fs::write(path, &json).map_err(|e| PrepError::ReportWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(path = %path.display(), "summary written");
    }

    let mtime = u64::try_from(report.date.epoch).unwrap_or_default();
    let writer = pipeline.finish(&json, mtime)?;
    Ok((report, writer))
}

/// Returns the path of the summary file written next to `destination`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use preptar_core::sibling_report_path;
///
/// assert_eq!(
///     sibling_report_path(Path::new("out/site.tar")),
///     Path::new("out/site.tar.json")
/// );
/// ```
#[must_use]
pub fn sibling_report_path(destination: &Path) -> PathBuf {
    let mut path = OsString::from(destination.as_os_str());
    path.push(".json");
    PathBuf::from(path)
}

/// Returns the default destination for `source`: `<dir>/<stem>.tar`, where
/// `<stem>` is the source file name up to its first `.`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use preptar_core::default_destination;
///
/// assert_eq!(
///     default_destination(Path::new("/in/site.tar.xz"), Path::new("/out")),
///     Path::new("/out/site.tar")
/// );
/// ```
#[must_use]
pub fn default_destination(source: &Path, dir: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name.as_str(),
    };
    dir.join(format!("{stem}.tar"))
}
