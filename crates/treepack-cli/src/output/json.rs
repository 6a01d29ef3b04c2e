//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::error::error_report;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use treepack_core::PackResult;
use treepack_core::ResultSummary;

pub struct JsonFormatter {
    quiet: bool,
}

impl JsonFormatter {
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

/// Archive metadata without the raw bytes, which live in the written file.
#[derive(Serialize)]
struct FileOutput<'a> {
    filename: &'a str,
    mime_type: &'a str,
    size: usize,
    path: String,
}

#[derive(Serialize)]
struct PackOutput<'a> {
    result: &'a ResultSummary,
    file: FileOutput<'a>,
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(&self, result: &PackResult, archive_path: &Path) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let data = PackOutput {
            result: &result.summary,
            file: FileOutput {
                filename: &result.archive.filename,
                mime_type: &result.archive.mime_type,
                size: result.archive.size(),
                path: archive_path.display().to_string(),
            },
        };

        Self::output(&JsonOutput::success("pack", data))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        // Errors are reported even in quiet mode
        let report = error_report(error);
        let output = JsonOutput::error(operation, report.error, report.details);
        let _ = Self::output(&output);
    }
}
