//! End-to-end pack pipeline.
//!
//! One invocation runs `Parsing → Materializing → Archiving → Reporting`
//! once each. Any failure aborts the remaining stages; the workspace is
//! removed before the call returns either way.

use crate::Clock;
use crate::PackConfig;
use crate::PackResult;
use crate::Result;
use crate::Stage;
use crate::SystemClock;
use crate::Workspace;
use crate::archive::build_archive;
use crate::materialize::materialize;
use crate::report::report;
use crate::structure::EntryPath;
use crate::structure::Structure;
use crate::structure::parse_structure;

/// Packs a raw structure description into a ZIP archive.
///
/// # Errors
///
/// Returns the first error raised by any stage:
/// - `PackError::InvalidInput` for blank or non-object input, or an invalid
///   `config`
/// - `PackError::Parse` for a malformed structure
/// - `PackError::UnsafePath` for paths escaping the workspace
/// - `PackError::Write` for filesystem failures while materializing
/// - `PackError::Archive` for failures while building the archive
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono::Utc;
/// use treepack_core::FixedClock;
/// use treepack_core::PackConfig;
/// use treepack_core::pack_structure;
///
/// let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
/// let raw = r#"{"files": [{"filename": "a.txt", "content": "hi"}, {"filename": "dir/b.txt"}]}"#;
///
/// let result = pack_structure(raw, &PackConfig::default(), &clock)?;
/// assert_eq!(result.summary.created_files, vec!["a.txt", "dir/b.txt"]);
/// # Ok::<(), treepack_core::PackError>(())
/// ```
pub fn pack_structure(raw: &str, config: &PackConfig, clock: &dyn Clock) -> Result<PackResult> {
    let span = tracing::debug_span!("pack");
    let _guard = span.enter();

    let result = run(raw, config, clock);
    match &result {
        Ok(result) => tracing::info!(
            files = result.summary.total_files,
            bytes = result.archive.size(),
            filename = %result.archive.filename,
            "packed structure"
        ),
        Err(err) => tracing::warn!(
            stage = %err.stage(),
            category = err.category(),
            "pack failed: {err}"
        ),
    }
    result
}

/// [`pack_structure`] with the wall clock.
///
/// # Errors
///
/// See [`pack_structure`].
pub fn pack(raw: &str, config: &PackConfig) -> Result<PackResult> {
    pack_structure(raw, config, &SystemClock)
}

fn run(raw: &str, config: &PackConfig, clock: &dyn Clock) -> Result<PackResult> {
    config.validate()?;

    tracing::debug!(stage = %Stage::Parsing, "entering stage");
    let structure = parse_structure(raw, config)?;

    let (created, archive_bytes) = build_in_workspace(&structure, config)?;

    tracing::debug!(stage = %Stage::Reporting, "entering stage");
    Ok(report(
        &created,
        structure.declared_paths(),
        archive_bytes,
        clock,
        config,
    ))
}

/// Materializes and archives inside a fresh workspace, then tears it down.
fn build_in_workspace(
    structure: &Structure,
    config: &PackConfig,
) -> Result<(Vec<EntryPath>, Vec<u8>)> {
    tracing::debug!(stage = %Stage::Materializing, "entering stage");
    let workspace = Workspace::acquire(config)?;

    let outcome = materialize(structure, &workspace).and_then(|created| {
        tracing::debug!(stage = %Stage::Archiving, "entering stage");
        let bytes = build_archive(workspace.root(), &created, config)?;
        Ok((created, bytes))
    });

    let root = workspace.root().to_path_buf();
    if let Err(err) = workspace.close() {
        tracing::warn!(root = %root.display(), "failed to remove workspace: {err}");
    }

    outcome
}
