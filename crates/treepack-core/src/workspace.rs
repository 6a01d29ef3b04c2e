//! Ephemeral, per-invocation workspace directory.

use crate::PackConfig;
use crate::PackError;
use crate::Result;
use crate::structure::EntryPath;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

const WORKSPACE_PREFIX: &str = "treepack-";

/// Owning guard over a uniquely named temporary directory.
///
/// The directory and everything materialized inside it is removed when the
/// guard is dropped, whichever way the invocation ends.
///
/// # Examples
///
/// ```
/// use treepack_core::PackConfig;
/// use treepack_core::Workspace;
///
/// let workspace = Workspace::acquire(&PackConfig::default())?;
/// let root = workspace.root().to_path_buf();
/// assert!(root.is_dir());
///
/// drop(workspace);
/// assert!(!root.exists());
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a fresh workspace under `config.workspace_parent`, or the
    /// system temporary directory when unset.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Write` if the directory cannot be created.
    pub fn acquire(config: &PackConfig) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let dir = match &config.workspace_parent {
            Some(parent) => builder.tempdir_in(parent).map_err(|source| PackError::Write {
                path: parent.clone(),
                source,
            })?,
            None => builder.tempdir().map_err(|source| PackError::Write {
                path: std::env::temp_dir(),
                source,
            })?,
        };

        tracing::debug!(root = %dir.path().display(), "acquired workspace");
        Ok(Self { dir })
    }

    /// Root directory of the workspace.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Host path of a validated entry inside this workspace.
    #[must_use]
    pub fn resolve(&self, path: &EntryPath) -> PathBuf {
        path.resolve(self.root())
    }

    /// Removes the workspace now, reporting any failure.
    ///
    /// Dropping the guard removes it too but swallows errors.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Write` if recursive removal fails.
    pub fn close(self) -> Result<()> {
        let root = self.root().to_path_buf();
        self.dir
            .close()
            .map_err(|source| PackError::Write { path: root, source })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_acquire_in_parent() {
        let parent = TempDir::new().unwrap();
        let config = PackConfig::default().with_workspace_parent(Some(parent.path().to_path_buf()));

        let workspace = Workspace::acquire(&config).unwrap();
        assert!(workspace.root().starts_with(parent.path()));
        let name = workspace.root().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(WORKSPACE_PREFIX));
    }

    #[test]
    fn test_drop_removes_contents() {
        let parent = TempDir::new().unwrap();
        let config = PackConfig::default().with_workspace_parent(Some(parent.path().to_path_buf()));

        let workspace = Workspace::acquire(&config).unwrap();
        fs::create_dir_all(workspace.root().join("a/b")).unwrap();
        fs::write(workspace.root().join("a/b/c.txt"), "x").unwrap();
        drop(workspace);

        assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_close_removes_directory() {
        let workspace = Workspace::acquire(&PackConfig::default()).unwrap();
        let root = workspace.root().to_path_buf();
        workspace.close().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_workspaces_are_unique() {
        let a = Workspace::acquire(&PackConfig::default()).unwrap();
        let b = Workspace::acquire(&PackConfig::default()).unwrap();
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn test_acquire_missing_parent_fails() {
        let parent = TempDir::new().unwrap();
        let missing = parent.path().join("does-not-exist");
        let config = PackConfig::default().with_workspace_parent(Some(missing));
        let err = Workspace::acquire(&config).unwrap_err();
        assert!(matches!(err, PackError::Write { .. }));
    }

    #[test]
    fn test_resolve() {
        let workspace = Workspace::acquire(&PackConfig::default()).unwrap();
        let path = EntryPath::parse("dir/b.txt", 32).unwrap();
        assert_eq!(workspace.resolve(&path), workspace.root().join("dir").join("b.txt"));
    }
}
