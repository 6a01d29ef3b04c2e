//! Validated relative path type for declared entries.

use crate::PackError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

/// A validated, normalized path relative to the workspace root.
///
/// `EntryPath` represents a declared path that has been checked to not
/// contain:
/// - Parent directory segments (`..`)
/// - Null bytes
/// - A leading separator or drive prefix
/// - More segments than the configured depth limit
///
/// Empty segments and `.` segments are dropped during normalization and `\`
/// is accepted as a separator, so the stored form is always segments joined
/// by `/`.
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`EntryPath::parse`]
/// - NO `From<String>` implementation
/// - Always resolves within the workspace root
///
/// # Examples
///
/// ```
/// use treepack_core::structure::EntryPath;
///
/// let path = EntryPath::parse("./src//main.rs", 32)?;
/// assert_eq!(path.as_str(), "src/main.rs");
///
/// assert!(EntryPath::parse("../escape.txt", 32).is_err());
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPath(String);

impl EntryPath {
    /// Validates and normalizes a declared path.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject null bytes
    /// 2. Reject a leading separator (absolute path)
    /// 3. Reject a drive prefix such as `C:` in the first retained segment
    /// 4. Reject `..` segments
    /// 5. Drop empty and `.` segments
    /// 6. Reject paths that normalize to nothing
    /// 7. Reject paths deeper than `max_depth`
    ///
    /// # Errors
    ///
    /// Returns `PackError::UnsafePath` if any step fails.
    pub fn parse(raw: &str, max_depth: usize) -> Result<Self> {
        if raw.contains('\0') {
            return Err(PackError::unsafe_path(raw, "path contains null bytes"));
        }

        if raw.starts_with(['/', '\\']) {
            return Err(PackError::unsafe_path(raw, "absolute paths are not allowed"));
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(PackError::unsafe_path(
                        raw,
                        "parent directory segments are not allowed",
                    ));
                }
                _ => {
                    if segments.is_empty() && is_drive_prefix(segment) {
                        return Err(PackError::unsafe_path(
                            raw,
                            "absolute paths are not allowed",
                        ));
                    }
                    segments.push(segment);
                }
            }
        }

        if segments.is_empty() {
            return Err(PackError::unsafe_path(raw, "path does not name a file"));
        }

        if segments.len() > max_depth {
            return Err(PackError::unsafe_path(
                raw,
                format!(
                    "path depth {} exceeds maximum {max_depth}",
                    segments.len()
                ),
            ));
        }

        Ok(Self(segments.join("/")))
    }

    /// Returns the normalized `/`-separated form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path's segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Resolves this path against a root directory using host separators.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use treepack_core::structure::EntryPath;
    ///
    /// let path = EntryPath::parse("dir/b.txt", 32)?;
    /// let full = path.resolve(Path::new("/tmp/ws"));
    /// assert!(full.starts_with("/tmp/ws"));
    /// assert!(full.ends_with("dir/b.txt"));
    /// # Ok::<(), treepack_core::PackError>(())
    /// ```
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut full = root.to_path_buf();
        full.extend(self.segments());
        full
    }
}

impl std::fmt::Display for EntryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `C:` style prefix, which Windows would treat as absolute.
fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
