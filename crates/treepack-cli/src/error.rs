//! Error conversion utilities for CLI.
//!
//! Converts treepack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance. The original
//! `PackError` stays reachable through `downcast_ref` so JSON output can
//! still report its category.

use anyhow::anyhow;
use treepack_core::ErrorReport;
use treepack_core::PackError;

/// Category reported for failures outside the pack pipeline.
pub const COMMAND_ERROR: &str = "CommandError";

/// Converts `PackError` to user-friendly anyhow error with context
pub fn convert_pack_error(err: PackError, source: &str) -> anyhow::Error {
    let context = match &err {
        PackError::InvalidInput { .. } => format!(
            "Invalid input from {source}\n\
             HINT: Provide a JSON object such as {{\"files\": [{{\"filename\": \"a.txt\", \"content\": \"...\"}}]}}."
        ),
        PackError::Parse { .. } => format!(
            "Malformed file structure in {source}\n\
             HINT: Every element of \"files\" needs a string \"filename\" and an optional string \"content\"."
        ),
        PackError::UnsafePath { path, .. } => format!(
            "Security violation: structure from {source} declares unsafe path '{path}'\n\
             HINT: Paths must be relative and must not contain '..' segments."
        ),
        PackError::Write { path, .. } => format!(
            "Failed to write '{}' while materializing {source}\n\
             HINT: Check that no path is declared both as a file and as a directory.",
            path.display()
        ),
        PackError::Archive { .. } => format!("Failed to build archive for {source}"),
    };
    anyhow::Error::new(err).context(context)
}

/// Builds the `{ error, details }` pair reported for any CLI failure.
pub fn error_report(err: &anyhow::Error) -> ErrorReport {
    err.downcast_ref::<PackError>().map_or_else(
        || ErrorReport {
            error: COMMAND_ERROR.to_string(),
            details: format!("{err:#}"),
        },
        ErrorReport::from,
    )
}

/// Error for an archive that already exists and may not be replaced.
pub fn output_exists(path: &std::path::Path) -> anyhow::Error {
    anyhow!(
        "Output file '{}' already exists\n\
         HINT: Use --force to overwrite it.",
        path.display()
    )
}
