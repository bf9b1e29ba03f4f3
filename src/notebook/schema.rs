//! Structural validation of notebook documents against the nbformat v4 minor
//! versions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const TOP_LEVEL_KEYS: &[&str] = &["metadata", "nbformat_minor", "nbformat", "cells"];
const OUTPUT_TYPES: &[&str] = &["execute_result", "display_data", "stream", "error"];

/// A supported notebook format variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotebookFormat {
    #[serde(rename = "4.0")]
    V4_0,
    #[serde(rename = "4.1")]
    V4_1,
    #[serde(rename = "4.2")]
    V4_2,
    #[serde(rename = "4.3")]
    V4_3,
    #[serde(rename = "4.4")]
    V4_4,
    #[serde(rename = "4.5")]
    V4_5,
}

impl NotebookFormat {
    pub const ALL: [NotebookFormat; 6] = [
        NotebookFormat::V4_0,
        NotebookFormat::V4_1,
        NotebookFormat::V4_2,
        NotebookFormat::V4_3,
        NotebookFormat::V4_4,
        NotebookFormat::V4_5,
    ];

    pub fn minor(&self) -> u64 {
        match self {
            NotebookFormat::V4_0 => 0,
            NotebookFormat::V4_1 => 1,
            NotebookFormat::V4_2 => 2,
            NotebookFormat::V4_3 => 3,
            NotebookFormat::V4_4 => 4,
            NotebookFormat::V4_5 => 5,
        }
    }

    fn has_cell_ids(&self) -> bool {
        *self >= NotebookFormat::V4_5
    }

    fn has_attachments(&self) -> bool {
        *self >= NotebookFormat::V4_1
    }

    /// Checks `document` against this variant, returning the first rule it
    /// breaks.
    pub fn validate(&self, document: &Value) -> Result<(), String> {
        let root = document
            .as_object()
            .ok_or_else(|| "document is not an object".to_string())?;

        check_keys(root, TOP_LEVEL_KEYS, TOP_LEVEL_KEYS, "notebook")?;

        if root.get("nbformat").and_then(Value::as_u64) != Some(4) {
            return Err("nbformat must be 4".to_string());
        }
        let minor = root
            .get("nbformat_minor")
            .and_then(Value::as_u64)
            .ok_or_else(|| "nbformat_minor must be a non-negative integer".to_string())?;
        if minor < self.minor() {
            return Err(format!(
                "nbformat_minor {} is below {} required by format {}",
                minor,
                self.minor(),
                self
            ));
        }

        let metadata = root["metadata"]
            .as_object()
            .ok_or_else(|| "metadata must be an object".to_string())?;
        self.validate_metadata(metadata)?;

        let cells = root["cells"]
            .as_array()
            .ok_or_else(|| "cells must be an array".to_string())?;
        for (index, cell) in cells.iter().enumerate() {
            self.validate_cell(cell)
                .map_err(|e| format!("cell {}: {}", index, e))?;
        }
        Ok(())
    }

    fn validate_metadata(&self, metadata: &Map<String, Value>) -> Result<(), String> {
        if let Some(kernelspec) = metadata.get("kernelspec") {
            let spec = kernelspec
                .as_object()
                .ok_or_else(|| "metadata.kernelspec must be an object".to_string())?;
            for key in ["name", "display_name"] {
                if !spec.get(key).is_some_and(Value::is_string) {
                    return Err(format!("metadata.kernelspec.{} must be a string", key));
                }
            }
        }
        if let Some(language_info) = metadata.get("language_info") {
            if !language_info.get("name").is_some_and(Value::is_string) {
                return Err("metadata.language_info.name must be a string".to_string());
            }
        }
        Ok(())
    }

    fn validate_cell(&self, cell: &Value) -> Result<(), String> {
        let cell = cell
            .as_object()
            .ok_or_else(|| "cell is not an object".to_string())?;
        let cell_type = cell
            .get("cell_type")
            .and_then(Value::as_str)
            .ok_or_else(|| "cell_type must be a string".to_string())?;

        let mut required = vec!["cell_type", "metadata", "source"];
        let mut allowed = required.clone();
        match cell_type {
            "code" => {
                required.extend(["outputs", "execution_count"]);
                allowed.extend(["outputs", "execution_count"]);
            }
            "markdown" | "raw" => {
                if self.has_attachments() {
                    allowed.push("attachments");
                }
            }
            other => return Err(format!("unknown cell_type `{}`", other)),
        }
        if self.has_cell_ids() {
            required.push("id");
            allowed.push("id");
        }
        check_keys(cell, &required, &allowed, cell_type)?;

        if !cell["metadata"].is_object() {
            return Err("metadata must be an object".to_string());
        }
        if !is_multiline_string(&cell["source"]) {
            return Err("source must be a string or a list of strings".to_string());
        }
        if let Some(id) = cell.get("id") {
            let id = id.as_str().ok_or_else(|| "id must be a string".to_string())?;
            let valid_chars = id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if id.is_empty() || id.len() > 64 || !valid_chars {
                return Err(format!("invalid cell id `{}`", id));
            }
        }

        if cell_type == "code" {
            let count = &cell["execution_count"];
            if !(count.is_null() || count.as_u64().is_some()) {
                return Err("execution_count must be null or a non-negative integer".to_string());
            }
            let outputs = cell["outputs"]
                .as_array()
                .ok_or_else(|| "outputs must be an array".to_string())?;
            for output in outputs {
                let kind = output.get("output_type").and_then(Value::as_str);
                if !kind.is_some_and(|k| OUTPUT_TYPES.contains(&k)) {
                    return Err("output has an unknown output_type".to_string());
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for NotebookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v4.{}", self.minor())
    }
}

fn check_keys(
    object: &Map<String, Value>,
    required: &[&str],
    allowed: &[&str],
    what: &str,
) -> Result<(), String> {
    for key in required {
        if !object.contains_key(*key) {
            return Err(format!("{} is missing required key `{}`", what, key));
        }
    }
    for key in object.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(format!("{} has unexpected key `{}`", what, key));
        }
    }
    Ok(())
}

fn is_multiline_string(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Array(items) => items.iter().all(Value::is_string),
        _ => false,
    }
}
