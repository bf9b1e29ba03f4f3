use tracing::{debug, info, warn};

use crate::error::{AppPackError, Result};
use crate::notebook::inspect::inspect_notebook;
use crate::notebook::{Notebook, NotebookFormat};
use crate::params::ParameterSet;

/// Validates a notebook against the accepted format variants and partitions
/// its parameters by role.
#[derive(Debug, Clone)]
pub struct NotebookParameterExtractor {
    formats: Vec<NotebookFormat>,
}

impl Default for NotebookParameterExtractor {
    fn default() -> Self {
        Self::new(NotebookFormat::ALL.to_vec())
    }
}

impl NotebookParameterExtractor {
    /// `formats` are tried in order; the first one that accepts the notebook
    /// wins.
    pub fn new(formats: Vec<NotebookFormat>) -> Self {
        Self { formats }
    }

    pub fn validate(&self, notebook: &Notebook) -> Result<NotebookFormat> {
        let mut failures = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            match format.validate(notebook.document()) {
                Ok(()) => {
                    debug!(notebook = notebook.source(), %format, "Notebook validated");
                    return Ok(*format);
                }
                Err(reason) => {
                    debug!(notebook = notebook.source(), %format, "Validation failed: {}", reason);
                    failures.push(format!("{}: {}", format, reason));
                }
            }
        }

        if failures.is_empty() {
            failures.push("no notebook formats configured".to_string());
        }
        warn!(notebook = notebook.source(), "Notebook matched no supported format");
        Err(AppPackError::Validation {
            path: notebook.source().to_string(),
            reason: failures.join("; "),
        })
    }

    pub fn extract(&self, notebook: &Notebook) -> Result<ParameterSet> {
        self.validate(notebook)?;

        let records = inspect_notebook(notebook);
        let params = ParameterSet::from_records(records)?;

        info!(
            notebook = notebook.source(),
            parameters = params.len(),
            stage_in = params.stage_in().map(|p| p.name()),
            stage_out = params.stage_out().map(|p| p.name()),
            "Extracted notebook parameters"
        );
        Ok(params)
    }
}
