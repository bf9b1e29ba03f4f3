pub mod builder;
pub mod extractor;
pub mod inspect;
pub mod schema;

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{AppPackError, Result};

pub use extractor::NotebookParameterExtractor;
pub use schema::NotebookFormat;

pub const PARAMETERS_TAG: &str = "parameters";

/// A parsed notebook document. The tree is kept as loaded; nothing in this
/// crate mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    source: String,
    document: Value,
}

impl Notebook {
    pub fn from_value(source: impl Into<String>, document: Value) -> Self {
        Self {
            source: source.into(),
            document,
        }
    }

    pub fn from_json_str(source: &str, text: &str) -> Result<Self> {
        let document = serde_json::from_str(text).map_err(|e| AppPackError::NotebookParse {
            path: source.to_string(),
            source: e,
        })?;
        Ok(Self::from_value(source, document))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AppPackError::NotebookNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&path.display().to_string(), &text)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn cells(&self) -> &[Value] {
        self.document
            .get("cells")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Source text of the first code cell tagged `parameters`.
    pub fn parameters_source(&self) -> Option<String> {
        self.cells()
            .iter()
            .filter(|cell| cell.get("cell_type").and_then(Value::as_str) == Some("code"))
            .find(|cell| {
                cell.pointer("/metadata/tags")
                    .and_then(Value::as_array)
                    .is_some_and(|tags| tags.iter().any(|t| t.as_str() == Some(PARAMETERS_TAG)))
            })
            .map(cell_source)
    }
}

/// Cell source is either one string or a list of line strings.
pub(crate) fn cell_source(cell: &Value) -> String {
    match cell.get("source") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}
