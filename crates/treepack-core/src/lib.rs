//! Declarative file-tree materialization and ZIP packing.
//!
//! `treepack-core` turns a JSON description of files and their contents into
//! a real directory tree inside an isolated, ephemeral workspace and packs
//! that tree into a reproducible in-memory ZIP archive. Declared paths are
//! validated before anything touches the filesystem, so nothing can be
//! written outside the workspace.
//!
//! # Examples
//!
//! ```
//! use treepack_core::PackConfig;
//! use treepack_core::pack;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = r#"{"files": [{"filename": "src/main.rs", "content": "fn main() {}\n"}]}"#;
//! let result = pack(raw, &PackConfig::default())?;
//! println!("Packed {} files into {}", result.summary.total_files, result.archive.filename);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod clock;
pub mod config;
pub mod error;
pub mod materialize;
pub mod pipeline;
pub mod report;
pub mod structure;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod workspace;

// Re-export main API types
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use config::PackConfig;
pub use error::ErrorReport;
pub use error::PackError;
pub use error::Result;
pub use error::Stage;
pub use pipeline::pack;
pub use pipeline::pack_structure;
pub use report::ArchiveFile;
pub use report::PackOutcome;
pub use report::PackResult;
pub use report::ResultSummary;
pub use workspace::Workspace;

// Re-export structure types for easier access
pub use structure::Entry;
pub use structure::EntryPath;
pub use structure::Structure;
