//! Writing a structure into a workspace.
//!
//! Duplicate declarations collapse to one file: the first entry declaring a
//! path decides its content, even when that entry has none and a later one
//! does.

use crate::PackError;
use crate::Result;
use crate::Workspace;
use crate::structure::EntryPath;
use crate::structure::Structure;
use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Distinct paths to create, in first-seen order, with their resolved content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializationPlan<'a> {
    files: IndexMap<&'a EntryPath, Option<&'a str>>,
}

impl<'a> MaterializationPlan<'a> {
    /// Number of distinct files the plan creates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the plan creates nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates `(path, content)` in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a EntryPath, Option<&'a str>)> + '_ {
        self.files.iter().map(|(path, content)| (*path, *content))
    }

    /// Content the plan writes for `path`, if the path is planned.
    #[must_use]
    pub fn content_of(&self, path: &EntryPath) -> Option<Option<&'a str>> {
        self.files.get(path).copied()
    }
}

/// Builds the ordered, de-duplicated creation plan for a structure.
///
/// # Examples
///
/// ```
/// use treepack_core::PackConfig;
/// use treepack_core::materialize::plan;
/// use treepack_core::structure::parse_structure;
///
/// let raw = r#"{"files": [
///     {"filename": "a.txt", "content": "first"},
///     {"filename": "a.txt", "content": "second"}
/// ]}"#;
/// let structure = parse_structure(raw, &PackConfig::default())?;
/// let plan = plan(&structure);
/// assert_eq!(plan.len(), 1);
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[must_use]
pub fn plan(structure: &Structure) -> MaterializationPlan<'_> {
    let mut files = IndexMap::with_capacity(structure.len());
    for entry in structure.entries() {
        if let MapEntry::Vacant(slot) = files.entry(&entry.path) {
            slot.insert(entry.content.as_deref());
        }
    }
    MaterializationPlan { files }
}

/// Materializes `structure` inside `workspace`.
///
/// Parent directories are created as needed. Each distinct path is written
/// exactly once, either with its content or as a zero-byte file.
///
/// Returns the distinct paths in creation order.
///
/// # Errors
///
/// Returns `PackError::Write` on the first directory or file that cannot be
/// created, including a file that already exists because two declared paths
/// name the same file on a case-insensitive filesystem. Nothing is rolled
/// back; the workspace guard owns cleanup.
pub fn materialize(structure: &Structure, workspace: &Workspace) -> Result<Vec<EntryPath>> {
    let plan = plan(structure);
    let mut created = Vec::with_capacity(plan.len());

    for (path, content) in plan.iter() {
        let full_path = workspace.resolve(path);

        if let Some(parent) = full_path.parent() {
            create_dir_all(parent)?;
        }

        write_file(&full_path, content.unwrap_or_default())?;
        tracing::trace!(path = %path, bytes = content.map_or(0, str::len), "materialized file");
        created.push(path.clone());
    }

    tracing::debug!(
        declared = structure.len(),
        created = created.len(),
        "materialized structure"
    );

    Ok(created)
}

fn create_dir_all(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| PackError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

/// Creates `path` fresh. An existing file means two distinct declared paths
/// alias on this host (case folding, Unicode normalization).
fn write_file(path: &Path, content: &str) -> Result<()> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| file.write_all(content.as_bytes()))
        .map_err(|source| PackError::Write {
            path: path.to_path_buf(),
            source,
        })
}
