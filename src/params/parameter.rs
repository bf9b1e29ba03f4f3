use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{AppPackError, Result};
use crate::params::literal::{Literal, parse_literal};
use crate::params::types::{CwlType, infer_cwl_type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    StageIn,
    StageOut,
    Argument,
}

impl Role {
    /// Classifies a type hint. Only the exact stage markers (any case) select
    /// a staging role.
    pub fn from_hint(hint: &str) -> Role {
        match hint.trim().to_lowercase().as_str() {
            "stage-in" | "stage_in" => Role::StageIn,
            "stage-out" | "stage_out" => Role::StageOut,
            _ => Role::Argument,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::StageIn => write!(f, "stage-in"),
            Role::StageOut => write!(f, "stage-out"),
            Role::Argument => write!(f, "argument"),
        }
    }
}

/// One parameter as reported by notebook inspection, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    /// `None` when inspection could not determine a type.
    #[serde(default)]
    pub inferred_type_name: Option<String>,
    #[serde(default)]
    pub help: String,
    /// Literal source text of the default value.
    pub default: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    raw_default: String,
    inferred_type_name: Option<String>,
    help_text: String,
    default: Option<Literal>,
    role: Role,
    cwl_type: CwlType,
}

impl Parameter {
    pub fn from_record(record: ParameterRecord) -> Self {
        let inferred_type_name = record
            .inferred_type_name
            .filter(|name| !name.trim().is_empty() && name.trim() != "None");

        let default = match parse_literal(&record.default) {
            Ok(literal) => Some(literal),
            Err(e) => {
                debug!(parameter = %record.name, "{}", e);
                None
            }
        };

        let role = Role::from_hint(
            inferred_type_name
                .as_deref()
                .unwrap_or(record.help.as_str()),
        );

        // Type inference falls back further than role resolution: with no
        // annotation and no help, the default's own literal type is used.
        let type_hint = match (&inferred_type_name, record.help.trim()) {
            (Some(name), _) => name.clone(),
            (None, help) if !help.is_empty() => help.to_string(),
            (None, _) => default
                .as_ref()
                .map(|d| d.type_name().to_string())
                .unwrap_or_default(),
        };
        let cwl_type = infer_cwl_type(&type_hint, &record.default);

        Parameter {
            name: record.name,
            raw_default: record.default,
            inferred_type_name,
            help_text: record.help,
            default,
            role,
            cwl_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_default(&self) -> &str {
        &self.raw_default
    }

    pub fn inferred_type_name(&self) -> Option<&str> {
        self.inferred_type_name.as_deref()
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn default(&self) -> Option<&Literal> {
        self.default.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn cwl_type(&self) -> CwlType {
        self.cwl_type
    }
}

/// The classified parameters of one notebook.
///
/// Holds at most one stage-in and at most one stage-out parameter; all other
/// parameters are arguments kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
    stage_in: Option<usize>,
    stage_out: Option<usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ParameterRecord>) -> Result<Self> {
        let mut set = ParameterSet::new();
        for record in records {
            set.push(Parameter::from_record(record))?;
        }
        Ok(set)
    }

    /// Appends a parameter, rejecting a second stage-in or stage-out.
    pub fn push(&mut self, parameter: Parameter) -> Result<()> {
        let index = self.parameters.len();
        let slot = match parameter.role() {
            Role::StageIn => &mut self.stage_in,
            Role::StageOut => &mut self.stage_out,
            Role::Argument => {
                self.parameters.push(parameter);
                return Ok(());
            }
        };

        if let Some(existing) = *slot {
            return Err(AppPackError::RoleConflict {
                role: parameter.role(),
                first: self.parameters[existing].name().to_string(),
                second: parameter.name().to_string(),
            });
        }
        *slot = Some(index);
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn stage_in(&self) -> Option<&Parameter> {
        self.stage_in.map(|i| &self.parameters[i])
    }

    pub fn stage_out(&self) -> Option<&Parameter> {
        self.stage_out.map(|i| &self.parameters[i])
    }

    pub fn arguments(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| p.role() == Role::Argument)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Plain-text table of name, inferred type, CWL type and default.
    pub fn summary(&self) -> String {
        let headers = ["name", "inferred_type", "cwl_type", "default"];
        let rows: Vec<[String; 4]> = self
            .parameters
            .iter()
            .map(|p| {
                [
                    p.name().to_string(),
                    p.inferred_type_name()
                        .unwrap_or(p.help_text())
                        .to_string(),
                    p.cwl_type().to_string(),
                    p.raw_default().to_string(),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let render = |cells: &[String]| {
            cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(render(&headers.map(String::from)));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &rows {
            lines.push(render(row));
        }
        lines.join("\n")
    }
}
