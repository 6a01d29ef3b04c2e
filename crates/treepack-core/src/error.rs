//! Error types for tree packing operations.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Pipeline stage a failure originated from.
///
/// A pack invocation moves through the stages in declaration order; the
/// first failing stage aborts every later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Decoding and validating the raw structure.
    Parsing,
    /// Writing files into the workspace.
    Materializing,
    /// Building the ZIP archive from the workspace.
    Archiving,
    /// Assembling the result record.
    Reporting,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Parsing => "parsing",
            Self::Materializing => "materializing",
            Self::Archiving => "archiving",
            Self::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while packing a structure.
#[derive(Error, Debug)]
pub enum PackError {
    /// Raw input is empty, not JSON, or not a JSON object.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Input decoded but does not describe a valid structure.
    #[error("parse error: {reason}")]
    Parse {
        /// What part of the structure is malformed.
        reason: String,
    },

    /// Declared path would resolve outside the workspace root.
    #[error("unsafe path '{path}': {reason}")]
    UnsafePath {
        /// The path as declared by the caller.
        path: String,
        /// Which rule the path violates.
        reason: String,
    },

    /// Filesystem failure while materializing the tree.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Workspace path that could not be created or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failure while building the archive.
    #[error("archive error: {reason}")]
    Archive {
        /// Description of the failure.
        reason: String,
    },
}

impl PackError {
    /// Returns the stable category name used in outward error reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use treepack_core::PackError;
    ///
    /// let err = PackError::UnsafePath {
    ///     path: "../escape.txt".to_string(),
    ///     reason: "parent directory segment".to_string(),
    /// };
    /// assert_eq!(err.category(), "UnsafePath");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "InvalidInput",
            Self::Parse { .. } => "ParseError",
            Self::UnsafePath { .. } => "UnsafePath",
            Self::Write { .. } => "WriteError",
            Self::Archive { .. } => "ArchiveError",
        }
    }

    /// Returns the pipeline stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::InvalidInput { .. } | Self::Parse { .. } | Self::UnsafePath { .. } => {
                Stage::Parsing
            }
            Self::Write { .. } => Stage::Materializing,
            Self::Archive { .. } => Stage::Archiving,
        }
    }

    /// Returns `true` if the input tried to escape the workspace.
    ///
    /// # Examples
    ///
    /// ```
    /// use treepack_core::PackError;
    ///
    /// let err = PackError::UnsafePath {
    ///     path: "/etc/passwd".to_string(),
    ///     reason: "absolute path".to_string(),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = PackError::Parse {
    ///     reason: "missing \"files\"".to_string(),
    /// };
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::UnsafePath { .. })
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsafe_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsafePath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn archive(reason: impl Into<String>) -> Self {
        Self::Archive {
            reason: reason.into(),
        }
    }
}

/// Uniform outward error record: `{ "error": <category>, "details": <message> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error category, e.g. `UnsafePath`.
    pub error: String,
    /// Human-readable detail message.
    pub details: String,
}

impl From<&PackError> for ErrorReport {
    fn from(err: &PackError) -> Self {
        Self {
            error: err.category().to_string(),
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackError::parse("\"files\" must be an array");
        assert_eq!(err.to_string(), "parse error: \"files\" must be an array");
    }

    #[test]
    fn test_unsafe_path_display() {
        let err = PackError::unsafe_path("../escape.txt", "parent directory segment");
        assert_eq!(
            err.to_string(),
            "unsafe path '../escape.txt': parent directory segment"
        );
    }

    #[test]
    fn test_write_error_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PackError::Write {
            path: PathBuf::from("/tmp/ws/a.txt"),
            source: io_err,
        };
        assert!(err.to_string().contains("a.txt"));
        assert!(err.to_string().contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_categories() {
        assert_eq!(PackError::invalid_input("x").category(), "InvalidInput");
        assert_eq!(PackError::parse("x").category(), "ParseError");
        assert_eq!(PackError::unsafe_path("a", "b").category(), "UnsafePath");
        assert_eq!(PackError::archive("x").category(), "ArchiveError");
        let err = PackError::Write {
            path: PathBuf::from("a"),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(err.category(), "WriteError");
    }

    #[test]
    fn test_stages() {
        assert_eq!(PackError::invalid_input("x").stage(), Stage::Parsing);
        assert_eq!(PackError::unsafe_path("a", "b").stage(), Stage::Parsing);
        assert_eq!(PackError::archive("x").stage(), Stage::Archiving);
        let err = PackError::Write {
            path: PathBuf::from("a"),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(err.stage(), Stage::Materializing);
    }

    #[test]
    fn test_error_report_shape() {
        let err = PackError::unsafe_path("../escape.txt", "parent directory segment");
        let report = ErrorReport::from(&err);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"], "UnsafePath");
        assert_eq!(
            json["details"],
            "unsafe path '../escape.txt': parent directory segment"
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Materializing.to_string(), "materializing");
        assert_eq!(Stage::Archiving.to_string(), "archiving");
    }
}
