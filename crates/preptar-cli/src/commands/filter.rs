//! Filter command implementation.

use crate::cli::FilterArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::ConsoleProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use preptar_core::FilterConfig;
use preptar_core::default_destination;
use preptar_core::prepare_archive_with_progress;
use preptar_core::sibling_report_path;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

pub fn execute(args: &FilterArgs, formatter: &dyn OutputFormatter, silent: bool) -> Result<()> {
    let destination = resolve_destination(args)?;
    let config = build_config(args)?;
    debug!(
        source = %args.source.display(),
        destination = %destination.display(),
        ?config,
        "starting filter"
    );

    let mut progress = ConsoleProgress::new(!silent, !silent && ConsoleProgress::should_show());
    progress.announce(&args.source, &destination);

    let report = add_archive_context(
        prepare_archive_with_progress(&args.source, &destination, &config, &mut progress),
        &args.source,
    )?;

    let mut warnings = Vec::new();
    if progress.failed() > 0 {
        warnings.push(format!(
            "{} entries could not be read and were left out of {}",
            progress.failed(),
            destination.display()
        ));
    }

    formatter.format_filter_result(
        &destination,
        &sibling_report_path(&destination),
        &report,
        &warnings,
    )
}

fn resolve_destination(args: &FilterArgs) -> Result<PathBuf> {
    let destination = match &args.destination {
        Some(path) => path.clone(),
        None => {
            let cwd = env::current_dir().context("failed to get current directory")?;
            default_destination(&args.source, &cwd)
        }
    };

    if destination.exists() {
        if is_same_file(&args.source, &destination) {
            bail!(
                "Destination '{}' is the source archive\n\
                 HINT: Pass a different DESTINATION.",
                destination.display()
            );
        }
        if !args.force {
            bail!(
                "Destination '{}' already exists\n\
                 HINT: Use --force to overwrite it.",
                destination.display()
            );
        }
    }

    Ok(destination)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn build_config(args: &FilterArgs) -> Result<FilterConfig> {
    let mut config = FilterConfig::default();
    if let Some(size) = args.read_buffer {
        config = config.with_read_buffer_size(to_usize(size, "--read-buffer")?);
    }
    if let Some(size) = args.write_buffer {
        config = config.with_write_buffer_size(to_usize(size, "--write-buffer")?);
    }
    if let Some(size) = args.spool_threshold {
        config = config.with_spool_threshold(to_usize(size, "--spool-threshold")?);
    }
    Ok(config)
}

fn to_usize(size: u64, flag: &str) -> Result<usize> {
    usize::try_from(size).with_context(|| format!("{flag} {size} is too large for this platform"))
}
