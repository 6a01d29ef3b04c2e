//! Pack result reporting.

use crate::Clock;
use crate::PackConfig;
use crate::archive::ZIP_MIME_TYPE;
use crate::error::ErrorReport;
use crate::structure::EntryPath;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

/// Metadata describing what a pack invocation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    /// Number of distinct files materialized.
    pub total_files: usize,
    /// Distinct materialized paths, in creation order.
    pub created_files: Vec<String>,
    /// Declared paths in declaration order, duplicates included.
    pub file_structure: Vec<String>,
    /// RFC 3339 time the result was assembled.
    pub timestamp: String,
}

/// The archive artifact bound to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveFile {
    /// ZIP bytes.
    pub data: Vec<u8>,
    /// Always `application/zip`.
    pub mime_type: String,
    /// Advisory download name, e.g. `created_files_20240309_140507.zip`.
    pub filename: String,
}

impl ArchiveFile {
    /// Archive size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Outcome of a successful pack invocation.
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
/// let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap());
/// let raw = r#"{"files": [{"filename": "a.txt", "content": "hi"}]}"#;
/// let result = pack_structure(raw, &PackConfig::default(), &clock)?;
///
/// assert_eq!(result.summary.total_files, 1);
/// assert_eq!(result.archive.filename, "created_files_20240309_140507.zip");
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackResult {
    /// Counts, paths and timestamp.
    #[serde(rename = "result")]
    pub summary: ResultSummary,
    /// The archive itself.
    #[serde(rename = "file")]
    pub archive: ArchiveFile,
}

/// Uniform outward shape: either the full result or `{ error, details }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PackOutcome {
    /// Pack succeeded.
    Success(PackResult),
    /// Pack failed; no archive was produced.
    Failure(ErrorReport),
}

impl PackOutcome {
    /// Collapses a pipeline result into the outward shape.
    #[must_use]
    pub fn from_result(result: crate::Result<PackResult>) -> Self {
        match result {
            Ok(result) => Self::Success(result),
            Err(err) => Self::Failure(ErrorReport::from(&err)),
        }
    }

    /// Returns `true` for a successful outcome.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Formats the archive filename for `instant`.
#[must_use]
pub fn archive_filename(prefix: &str, instant: DateTime<Utc>) -> String {
    format!("{prefix}_{}.zip", instant.format("%Y%m%d_%H%M%S"))
}

/// Assembles the result record.
///
/// The clock is read once so the timestamp and the filename always agree.
#[must_use]
pub fn report(
    created: &[EntryPath],
    declared: Vec<String>,
    archive_bytes: Vec<u8>,
    clock: &dyn Clock,
    config: &PackConfig,
) -> PackResult {
    let now = clock.now();

    PackResult {
        summary: ResultSummary {
            total_files: created.len(),
            created_files: created.iter().map(|p| p.as_str().to_string()).collect(),
            file_structure: declared,
            timestamp: now.to_rfc3339(),
        },
        archive: ArchiveFile {
            data: archive_bytes,
            mime_type: ZIP_MIME_TYPE.to_string(),
            filename: archive_filename(&config.filename_prefix, now),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use crate::PackError;
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap())
    }

    fn paths(names: &[&str]) -> Vec<EntryPath> {
        names.iter().map(|n| EntryPath::parse(n, 32).unwrap()).collect()
    }

    #[test]
    fn test_report_fields() {
        let created = paths(&["a.txt", "dir/b.txt"]);
        let declared = vec!["a.txt".to_string(), "dir/b.txt".to_string(), "a.txt".to_string()];

        let result = report(&created, declared.clone(), vec![1, 2, 3], &clock(), &PackConfig::default());

        assert_eq!(result.summary.total_files, 2);
        assert_eq!(result.summary.created_files, vec!["a.txt", "dir/b.txt"]);
        assert_eq!(result.summary.file_structure, declared);
        assert_eq!(result.summary.timestamp, "2024-03-09T14:05:07+00:00");
        assert_eq!(result.archive.mime_type, "application/zip");
        assert_eq!(result.archive.filename, "created_files_20240309_140507.zip");
        assert_eq!(result.archive.size(), 3);
    }

    #[test]
    fn test_timestamp_is_parseable() {
        let result = report(&[], Vec::new(), Vec::new(), &clock(), &PackConfig::default());
        let parsed = DateTime::parse_from_rfc3339(&result.summary.timestamp).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), clock().now());
    }

    #[test]
    fn test_custom_prefix() {
        let config = PackConfig::default().with_filename_prefix("scaffold");
        let result = report(&[], Vec::new(), Vec::new(), &clock(), &config);
        assert_eq!(result.archive.filename, "scaffold_20240309_140507.zip");
    }

    #[test]
    fn test_success_outcome_shape() {
        let created = paths(&["a.txt"]);
        let result = report(&created, vec!["a.txt".to_string()], vec![7], &clock(), &PackConfig::default());
        let json = serde_json::to_value(PackOutcome::Success(result)).unwrap();

        assert_eq!(json["result"]["total_files"], 1);
        assert_eq!(json["result"]["created_files"][0], "a.txt");
        assert_eq!(json["result"]["file_structure"][0], "a.txt");
        assert_eq!(json["result"]["timestamp"], "2024-03-09T14:05:07+00:00");
        assert_eq!(json["file"]["mime_type"], "application/zip");
        assert_eq!(json["file"]["filename"], "created_files_20240309_140507.zip");
        assert_eq!(json["file"]["data"][0], 7);
    }

    #[test]
    fn test_failure_outcome_shape() {
        let outcome = PackOutcome::from_result(Err(PackError::unsafe_path(
            "../escape.txt",
            "parent directory segments are not allowed",
        )));
        assert!(!outcome.is_success());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error"], "UnsafePath");
        assert!(json["details"].as_str().unwrap().contains("../escape.txt"));
        assert!(json.get("file").is_none());
    }
}
