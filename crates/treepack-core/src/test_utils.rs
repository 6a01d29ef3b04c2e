//! Test utilities for structure input and archive inspection.
//!
//! # Panics
//!
//! All functions in this module may panic on malformed archives since they
//! are designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use serde_json::json;
use std::io::Cursor;
use std::io::Read;

/// Builds a raw structure description from `(filename, content)` pairs.
///
/// # Examples
///
/// ```
/// use treepack_core::test_utils::structure_json;
///
/// let raw = structure_json(&[("a.txt", Some("hi")), ("dir/b.txt", None)]);
/// assert!(raw.contains("\"filename\":\"dir/b.txt\""));
/// ```
#[must_use]
pub fn structure_json(entries: &[(&str, Option<&str>)]) -> String {
    let files: Vec<_> = entries
        .iter()
        .map(|(filename, content)| match content {
            Some(content) => json!({ "filename": filename, "content": content }),
            None => json!({ "filename": filename }),
        })
        .collect();
    json!({ "files": files }).to_string()
}

/// Reads every entry of an in-memory ZIP archive, in archive order.
///
/// # Examples
///
/// ```
/// use treepack_core::PackConfig;
/// use treepack_core::pack;
/// use treepack_core::test_utils::read_zip_entries;
/// use treepack_core::test_utils::structure_json;
///
/// let result = pack(&structure_json(&[("a.txt", Some("hi"))]), &PackConfig::default())?;
/// assert_eq!(read_zip_entries(&result.archive.data), vec![("a.txt".to_string(), b"hi".to_vec())]);
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[must_use]
pub fn read_zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        entries.push((file.name().to_string(), data));
    }

    entries
}
