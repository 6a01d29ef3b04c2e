//! Declarative structure model and parsing.
//!
//! A structure is the caller-supplied, ordered list of entries that describe
//! the tree to materialize. Paths are validated here, before anything
//! touches the filesystem.

mod parser;
mod path;

pub use parser::parse_structure;
pub use path::EntryPath;

/// One declared `(path, optional content)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Validated path relative to the workspace root.
    pub path: EntryPath,
    /// UTF-8 content; `None` materializes a zero-byte file.
    pub content: Option<String>,
}

impl Entry {
    /// Creates an entry from an already validated path.
    #[must_use]
    pub fn new(path: EntryPath, content: Option<String>) -> Self {
        Self { path, content }
    }
}

/// Ordered sequence of entries as declared. Paths may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    entries: Vec<Entry>,
}

impl Structure {
    /// Creates a structure from entries in declaration order.
    #[must_use]
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Returns the entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of declared entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared paths in order, duplicates included.
    #[must_use]
    pub fn declared_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.path.as_str().to_string())
            .collect()
    }
}
