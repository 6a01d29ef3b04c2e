//! Configuration for pack operations.

use crate::PackError;
use crate::Result;
use std::path::PathBuf;

/// Default prefix of generated archive filenames.
pub const DEFAULT_FILENAME_PREFIX: &str = "created_files";

/// Configuration for pack operations.
///
/// Controls path validation limits, compression, and where the ephemeral
/// workspace lives.
///
/// # Examples
///
/// ```
/// use treepack_core::PackConfig;
///
/// // Use defaults
/// let config = PackConfig::default();
///
/// // Customize for specific needs
/// let custom = PackConfig::default()
///     .with_compression_level(9)
///     .with_max_entries(500);
/// ```
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Deflate compression level (1-9).
    ///
    /// `None` stores entries uncompressed.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Maximum number of segments in a declared path.
    ///
    /// Default: `32`.
    pub max_path_depth: usize,

    /// Maximum number of entries a structure may declare.
    ///
    /// Default: `10_000`.
    pub max_entries: usize,

    /// Directory in which the per-invocation workspace is created.
    ///
    /// `None` uses the system temporary directory.
    ///
    /// Default: `None`.
    pub workspace_parent: Option<PathBuf>,

    /// Prefix of the generated archive filename.
    ///
    /// Default: `"created_files"`.
    pub filename_prefix: String,
}

impl Default for PackConfig {
    /// Creates a `PackConfig` with default settings.
    ///
    /// Default values:
    /// - `compression_level`: `Some(6)`
    /// - `max_path_depth`: `32`
    /// - `max_entries`: `10_000`
    /// - `workspace_parent`: `None`
    /// - `filename_prefix`: `"created_files"`
    fn default() -> Self {
        Self {
            compression_level: Some(6),
            max_path_depth: 32,
            max_entries: 10_000,
            workspace_parent: None,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
        }
    }
}

impl PackConfig {
    /// Creates a new `PackConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the compression level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = Some(level);
        self
    }

    /// Stores entries without compression.
    #[must_use]
    pub fn with_stored_entries(mut self) -> Self {
        self.compression_level = None;
        self
    }

    /// Sets the maximum path depth.
    #[must_use]
    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    /// Sets the maximum number of declared entries.
    #[must_use]
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the directory that will hold the workspace.
    #[must_use]
    pub fn with_workspace_parent(mut self, parent: Option<PathBuf>) -> Self {
        self.workspace_parent = parent;
        self
    }

    /// Sets the archive filename prefix.
    #[must_use]
    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidInput` if:
    /// - Compression level is set but not in range 1-9
    /// - `max_path_depth` or `max_entries` is zero
    /// - `filename_prefix` is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(PackError::invalid_input(format!(
                "compression level must be 1-9, got {level}"
            )));
        }
        if self.max_path_depth == 0 {
            return Err(PackError::invalid_input("max path depth must be positive"));
        }
        if self.max_entries == 0 {
            return Err(PackError::invalid_input("max entries must be positive"));
        }
        if self.filename_prefix.is_empty()
            || self.filename_prefix.contains(['/', '\\'])
        {
            return Err(PackError::invalid_input(format!(
                "invalid filename prefix: '{}'",
                self.filename_prefix
            )));
        }
        Ok(())
    }
}
