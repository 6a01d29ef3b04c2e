//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::convert_pack_error;
use crate::error::output_exists;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::env;
use std::fs;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use tempfile::NamedTempFile;
use treepack_core::PackConfig;
use treepack_core::pack;

pub fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let (raw, source) = read_structure(args)?;
    let config = build_config(args);

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let result = pack(&raw, &config).map_err(|e| convert_pack_error(e, &source))?;

    let archive_path = output_dir.join(&result.archive.filename);
    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory '{}'", output_dir.display())
    })?;
    write_archive(&output_dir, &archive_path, &result.archive.data, args.force)?;

    tracing::debug!(path = %archive_path.display(), "archive written");

    formatter.format_pack_result(&result, &archive_path)?;

    Ok(())
}

/// Stages the archive in `dir` and renames it to `archive_path`.
///
/// Without `force` the rename fails if `archive_path` exists. A failed write
/// never leaves a partial archive behind.
fn write_archive(dir: &Path, archive_path: &Path, data: &[u8], force: bool) -> Result<()> {
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage archive in '{}'", dir.display()))?;
    staged
        .write_all(data)
        .with_context(|| format!("failed to write archive '{}'", archive_path.display()))?;

    let persisted = if force {
        staged.persist(archive_path)
    } else {
        staged.persist_noclobber(archive_path)
    };

    match persisted {
        Ok(_) => Ok(()),
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            Err(output_exists(archive_path))
        }
        Err(err) => Err(anyhow::Error::new(err.error)
            .context(format!("failed to write archive '{}'", archive_path.display()))),
    }
}

/// Reads the raw structure and a label naming where it came from.
fn read_structure(args: &PackArgs) -> Result<(String, String)> {
    if let Some(inline) = &args.structure {
        return Ok((inline.clone(), "--structure".to_string()));
    }

    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read structure file '{}'", path.display()))?;
            Ok((raw, format!("'{}'", path.display())))
        }
        _ => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read structure from stdin")?;
            Ok((raw, "stdin".to_string()))
        }
    }
}

fn build_config(args: &PackArgs) -> PackConfig {
    let mut config = PackConfig::default()
        .with_max_entries(usize::try_from(args.max_entries).unwrap_or(usize::MAX))
        .with_max_path_depth(usize::try_from(args.max_depth).unwrap_or(usize::MAX));

    if args.store {
        config = config.with_stored_entries();
    } else if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    if let Some(prefix) = &args.prefix {
        config = config.with_filename_prefix(prefix.clone());
    }

    config
}
