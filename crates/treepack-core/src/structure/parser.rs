//! Decoding of raw JSON structure descriptions.

use super::Entry;
use super::EntryPath;
use super::Structure;
use crate::PackConfig;
use crate::PackError;
use crate::Result;
use serde_json::Map;
use serde_json::Value;

/// Parses a raw `{ "files": [ { "filename", "content" } ] }` description.
///
/// Declaration order is preserved and duplicates are kept; resolving them is
/// the materializer's job.
///
/// # Errors
///
/// - `PackError::InvalidInput` if `raw` is blank, not JSON, or not a JSON
///   object
/// - `PackError::Parse` if `"files"` is missing or not an array, an element
///   is not an object, `"filename"` is missing, empty, or not a string,
///   `"content"` is neither a string nor `null`, or the entry count exceeds
///   `config.max_entries`
/// - `PackError::UnsafePath` if a filename escapes the workspace root
///
/// # Examples
///
/// ```
/// use treepack_core::PackConfig;
/// use treepack_core::structure::parse_structure;
///
/// let raw = r#"{"files": [{"filename": "a.txt", "content": "hi"}, {"filename": "dir/b.txt"}]}"#;
/// let structure = parse_structure(raw, &PackConfig::default())?;
/// assert_eq!(structure.len(), 2);
/// assert_eq!(structure.entries()[1].content, None);
/// # Ok::<(), treepack_core::PackError>(())
/// ```
pub fn parse_structure(raw: &str, config: &PackConfig) -> Result<Structure> {
    if raw.trim().is_empty() {
        return Err(PackError::invalid_input("structure must be a non-empty string"));
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| PackError::invalid_input(format!("structure is not valid JSON: {e}")))?;

    let Value::Object(root) = value else {
        return Err(PackError::invalid_input(format!(
            "structure must be a JSON object, got {}",
            kind_of(&value)
        )));
    };

    let files = match root.get("files") {
        Some(Value::Array(files)) => files,
        Some(other) => {
            return Err(PackError::parse(format!(
                "\"files\" must be an array, got {}",
                kind_of(other)
            )));
        }
        None => return Err(PackError::parse("missing \"files\" array")),
    };

    if files.len() > config.max_entries {
        return Err(PackError::parse(format!(
            "structure declares {} entries, maximum is {}",
            files.len(),
            config.max_entries
        )));
    }

    let entries = files
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_entry(idx, item, config))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(entries = entries.len(), "parsed structure");

    Ok(Structure::new(entries))
}

fn parse_entry(idx: usize, item: &Value, config: &PackConfig) -> Result<Entry> {
    let Value::Object(fields) = item else {
        return Err(PackError::parse(format!(
            "files[{idx}] must be an object, got {}",
            kind_of(item)
        )));
    };

    let filename = filename_field(idx, fields)?;
    let path = EntryPath::parse(filename, config.max_path_depth)?;

    let content = match fields.get("content") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            return Err(PackError::parse(format!(
                "files[{idx}].content must be a string, got {}",
                kind_of(other)
            )));
        }
    };

    Ok(Entry::new(path, content))
}

fn filename_field<'a>(idx: usize, fields: &'a Map<String, Value>) -> Result<&'a str> {
    match fields.get("filename") {
        Some(Value::String(name)) if name.is_empty() => Err(PackError::parse(format!(
            "files[{idx}].filename must not be empty"
        ))),
        Some(Value::String(name)) => Ok(name),
        Some(other) => Err(PackError::parse(format!(
            "files[{idx}].filename must be a string, got {}",
            kind_of(other)
        ))),
        None => Err(PackError::parse(format!(
            "files[{idx}] is missing \"filename\""
        ))),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
