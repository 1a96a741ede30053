//! Manifest synchronization.
//!
//! The shared manifest is a JSON array of framework entries consumed by a
//! downstream listing service. kitforge owns only the entries whose `name`
//! matches a registered output folder: an upsert overwrites a matching
//! entry in place (keeping its position and any fields kitforge does not
//! model) or appends a new one at the end. Everything else in the file is
//! preserved verbatim, including malformed elements without a `name`.
//!
//! The sequential pipeline needs no locking here; anyone parallelizing the
//! pipeline across templates must serialize this read-modify-write behind a
//! mutex, or concurrent upserts will lose updates.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{KitforgeError, Result};
use crate::registry::TemplateDefinition;

/// One row of the shared manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkEntry {
    /// Framework name; equals the template's output folder.
    pub name: String,

    /// Whether the framework ships a starter-kit variant.
    pub has_starter_kit: bool,
}

impl From<&TemplateDefinition> for FrameworkEntry {
    fn from(template: &TemplateDefinition) -> Self {
        Self {
            name: template.output_folder.to_string(),
            has_starter_kit: template.has_starter_kit,
        }
    }
}

/// Load the manifest entries. A missing file is an empty manifest; an
/// existing file that is not a JSON array is [`KitforgeError::ManifestCorrupt`].
pub fn load(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| KitforgeError::ManifestCorrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    match value {
        Value::Array(entries) => Ok(entries),
        other => Err(KitforgeError::ManifestCorrupt {
            path: path.to_path_buf(),
            message: format!("expected a JSON array, found {}", json_kind(&other)),
        }),
    }
}

/// Insert or update one entry, keyed by `name`, and write the manifest back
/// pretty-printed. All unrelated entries are preserved byte-for-byte at the
/// value level; elements without a string `name` are never matched and never
/// an error.
pub fn upsert(path: &Path, entry: &FrameworkEntry) -> Result<()> {
    let mut entries = load(path)?;

    let position = entries
        .iter()
        .position(|v| v.get("name").and_then(Value::as_str) == Some(entry.name.as_str()));

    match position {
        Some(index) => {
            // `get("name")` only matches objects, so this always succeeds.
            if let Value::Object(fields) = &mut entries[index] {
                fields.insert("name".to_string(), Value::String(entry.name.clone()));
                fields.insert(
                    "hasStarterKit".to_string(),
                    Value::Bool(entry.has_starter_kit),
                );
            }
        }
        None => {
            entries.push(serde_json::to_value(entry).map_err(anyhow::Error::from)?);
        }
    }

    write(path, &entries)
}

/// Write the full entry sequence, pretty-printed with 2-space indentation
/// and a trailing newline.
pub fn write(path: &Path, entries: &[Value]) -> Result<()> {
    let mut content =
        serde_json::to_string_pretty(entries).map_err(anyhow::Error::from)?;
    content.push('\n');
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
