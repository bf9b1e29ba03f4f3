use serde_json::{Value, json};

use crate::notebook::{Notebook, NotebookFormat, PARAMETERS_TAG};

pub struct NotebookBuilder {
    name: String,
    format: NotebookFormat,
    kernel: Option<String>,
    cells: Vec<Value>,
}

impl NotebookBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            format: NotebookFormat::V4_4,
            kernel: Some("python3".to_string()),
            cells: Vec::new(),
        }
    }

    pub fn format(mut self, format: NotebookFormat) -> Self {
        self.format = format;
        self
    }

    pub fn without_kernel(mut self) -> Self {
        self.kernel = None;
        self
    }

    pub fn markdown(mut self, source: &str) -> Self {
        self.cells.push(json!({
            "cell_type": "markdown",
            "metadata": {},
            "source": source,
        }));
        self
    }

    pub fn code(mut self, source: &str) -> Self {
        self.cells.push(code_cell(source, &[]));
        self
    }

    /// Starts a code cell tagged as the parameters cell.
    pub fn parameters(self) -> ParametersBuilder {
        ParametersBuilder {
            notebook_builder: self,
            lines: Vec::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        let cells: Vec<Value> = self
            .cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let mut cell = cell.clone();
                if self.format >= NotebookFormat::V4_5 {
                    if let Some(obj) = cell.as_object_mut() {
                        obj.insert("id".to_string(), json!(format!("cell-{}", index)));
                    }
                }
                cell
            })
            .collect();

        let metadata = match &self.kernel {
            Some(kernel) => json!({
                "kernelspec": {"name": kernel, "display_name": kernel, "language": "python"},
                "language_info": {"name": "python"},
            }),
            None => json!({}),
        };

        json!({
            "cells": cells,
            "metadata": metadata,
            "nbformat": 4,
            "nbformat_minor": self.format.minor(),
        })
    }

    pub fn to_json_string(&self) -> String {
        let value = self.to_value();
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }

    pub fn build(self) -> Notebook {
        let document = self.to_value();
        Notebook::from_value(self.name, document)
    }
}

pub struct ParametersBuilder {
    notebook_builder: NotebookBuilder,
    lines: Vec<String>,
}

impl ParametersBuilder {
    /// `name = default`
    pub fn param(mut self, name: &str, default: &str) -> Self {
        self.lines.push(format!("{} = {}", name, default));
        self
    }

    /// `name: annotation = default`
    pub fn typed(mut self, name: &str, annotation: &str, default: &str) -> Self {
        self.lines.push(format!("{}: {} = {}", name, annotation, default));
        self
    }

    /// `name = default  # help`
    pub fn hinted(mut self, name: &str, default: &str, help: &str) -> Self {
        self.lines.push(format!("{} = {}  # {}", name, default, help));
        self
    }

    pub fn line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn build(mut self) -> NotebookBuilder {
        let source = self.lines.join("\n");
        self.notebook_builder
            .cells
            .push(code_cell(&source, &[PARAMETERS_TAG]));
        self.notebook_builder
    }
}

fn code_cell(source: &str, tags: &[&str]) -> Value {
    let metadata = if tags.is_empty() {
        json!({})
    } else {
        json!({ "tags": tags })
    };
    // Multi-line sources are stored as a list of lines, newline kept.
    let lines: Vec<String> = source.split_inclusive('\n').map(String::from).collect();
    json!({
        "cell_type": "code",
        "execution_count": null,
        "metadata": metadata,
        "outputs": [],
        "source": lines,
    })
}
