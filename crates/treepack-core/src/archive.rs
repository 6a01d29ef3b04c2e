//! In-memory ZIP archive creation from a materialized workspace.
//!
//! Archives are reproducible: entries are sorted by their full relative
//! path and carry fixed metadata, so the same tree always yields the same
//! bytes.

use crate::PackConfig;
use crate::PackError;
use crate::Result;
use crate::structure::EntryPath;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Cursor;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// MIME type of the produced archive.
pub const ZIP_MIME_TYPE: &str = "application/zip";

const FILE_MODE: u32 = 0o644;

/// A regular file found in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchiveEntry {
    /// `/`-separated name relative to the workspace root.
    pub name: String,
    /// Full host path of the file.
    pub path: PathBuf,
}

/// Collects every regular file under `root`, sorted by archive name.
///
/// Directories only contribute through the files they contain; symlinks are
/// not followed and not archived.
///
/// # Errors
///
/// Returns `PackError::Archive` if the tree cannot be walked or a path is
/// not valid UTF-8.
pub fn collect_entries(root: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| PackError::archive(format!("walkdir error: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).map_err(|_| {
            PackError::archive(format!(
                "{} is outside the workspace",
                entry.path().display()
            ))
        })?;

        entries.push(ArchiveEntry {
            name: normalize_zip_path(relative)?,
            path: entry.path().to_path_buf(),
        });
    }

    entries.sort();
    Ok(entries)
}

/// Builds a ZIP archive of the workspace at `root`.
///
/// `expected` lists the paths the materializer created; the walked tree must
/// contain exactly those files.
///
/// # Examples
///
/// ```
/// use treepack_core::PackConfig;
/// use treepack_core::Workspace;
/// use treepack_core::archive::build_archive;
/// use treepack_core::materialize::materialize;
/// use treepack_core::structure::parse_structure;
///
/// let config = PackConfig::default();
/// let structure = parse_structure(r#"{"files": [{"filename": "a.txt", "content": "hi"}]}"#, &config)?;
/// let workspace = Workspace::acquire(&config)?;
/// let created = materialize(&structure, &workspace)?;
///
/// let bytes = build_archive(workspace.root(), &created, &config)?;
/// assert_eq!(&bytes[0..4], b"PK\x03\x04");
/// # Ok::<(), treepack_core::PackError>(())
/// ```
///
/// # Errors
///
/// Returns `PackError::Archive` if walking, reading, compressing, or
/// finishing the archive fails, or if the workspace holds files other than
/// `expected`.
pub fn build_archive(root: &Path, expected: &[EntryPath], config: &PackConfig) -> Result<Vec<u8>> {
    let entries = collect_entries(root)?;
    verify_entries(&entries, expected)?;

    let options = file_options(config);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in &entries {
        zip.start_file(entry.name.as_str(), options).map_err(|e| {
            PackError::archive(format!("failed to start entry '{}': {e}", entry.name))
        })?;

        let mut file = File::open(&entry.path)
            .map_err(|e| PackError::archive(format!("failed to read '{}': {e}", entry.name)))?;
        std::io::copy(&mut file, &mut zip)
            .map_err(|e| PackError::archive(format!("failed to write '{}': {e}", entry.name)))?;
    }

    let bytes = zip
        .finish()
        .map_err(|e| PackError::archive(format!("failed to finish ZIP archive: {e}")))?
        .into_inner();

    tracing::debug!(entries = entries.len(), bytes = bytes.len(), "built archive");
    Ok(bytes)
}

fn file_options(config: &PackConfig) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(FILE_MODE);

    match config.compression_level {
        Some(level) => options
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level))),
        None => options.compression_method(CompressionMethod::Stored),
    }
}

fn verify_entries(entries: &[ArchiveEntry], expected: &[EntryPath]) -> Result<()> {
    let expected: BTreeSet<&str> = expected.iter().map(EntryPath::as_str).collect();

    if let Some(extra) = entries.iter().find(|e| !expected.contains(e.name.as_str())) {
        return Err(PackError::archive(format!(
            "workspace contains undeclared file '{}'",
            extra.name
        )));
    }

    let found: BTreeSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    if let Some(missing) = expected.iter().find(|name| !found.contains(*name)) {
        return Err(PackError::archive(format!(
            "declared file '{missing}' is missing from the workspace"
        )));
    }

    Ok(())
}

/// Joins the normal components of a relative path with `/`.
fn normalize_zip_path(path: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str().ok_or_else(|| {
                    PackError::archive(format!("path is not valid UTF-8: {}", path.display()))
                })?;
                segments.push(segment);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(PackError::archive(format!(
                    "entry path is not relative: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(segments.join("/"))
}
