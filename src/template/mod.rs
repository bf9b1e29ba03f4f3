pub mod loader;

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::{AppPackError, Result};

pub const WORKFLOW_TEMPLATE: &str = "workflow.cwl";
pub const STAGE_IN_TEMPLATE: &str = "stage_in.cwl";
pub const PROCESS_TEMPLATE: &str = "process.cwl";
pub const STAGE_OUT_TEMPLATE: &str = "stage_out.cwl";
pub const DESCRIPTOR_TEMPLATE: &str = "app_desc.json";

const BUILTIN_WORKFLOW: &str = include_str!("../../templates/workflow.cwl");
const BUILTIN_STAGE_IN: &str = include_str!("../../templates/stage_in.cwl");
const BUILTIN_PROCESS: &str = include_str!("../../templates/process.cwl");
const BUILTIN_STAGE_OUT: &str = include_str!("../../templates/stage_out.cwl");
const BUILTIN_DESCRIPTOR: &str = include_str!("../../templates/app_desc.json");

#[derive(Debug, Clone, PartialEq)]
pub struct CwlDocument {
    value: YamlValue,
}

pub type WorkflowGraph = CwlDocument;
pub type ProcessDefinition = CwlDocument;

impl CwlDocument {
    pub fn new(value: YamlValue) -> Self {
        Self { value }
    }

    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let value = serde_yaml::from_str(text).map_err(|e| AppPackError::Serialization {
            artifact: name.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self { value })
    }

    pub fn value(&self) -> &YamlValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut YamlValue {
        &mut self.value
    }

    /// Looks up a nested mapping key path, e.g. `["steps", "process", "in"]`.
    pub fn get(&self, path: &[&str]) -> Option<&YamlValue> {
        path.iter().try_fold(&self.value, |node, key| node.get(*key))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    value: JsonValue,
}

impl Descriptor {
    pub fn new(value: JsonValue) -> Self {
        Self { value }
    }

    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let value = serde_json::from_str(text).map_err(|e| AppPackError::Serialization {
            artifact: name.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self { value })
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut JsonValue {
        &mut self.value
    }
}

/// Every template one generation run starts from. Each run clones what it
/// mutates; the set itself is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    pub workflow: WorkflowGraph,
    pub stage_in: CwlDocument,
    pub process: ProcessDefinition,
    pub stage_out: CwlDocument,
    pub descriptor: Descriptor,
}

impl TemplateSet {
    pub fn builtin() -> Result<Self> {
        Self::parse(
            BUILTIN_WORKFLOW,
            BUILTIN_STAGE_IN,
            BUILTIN_PROCESS,
            BUILTIN_STAGE_OUT,
            BUILTIN_DESCRIPTOR,
        )
    }

    pub fn parse(
        workflow: &str,
        stage_in: &str,
        process: &str,
        stage_out: &str,
        descriptor: &str,
    ) -> Result<Self> {
        Ok(Self {
            workflow: CwlDocument::parse(WORKFLOW_TEMPLATE, workflow)?,
            stage_in: CwlDocument::parse(STAGE_IN_TEMPLATE, stage_in)?,
            process: CwlDocument::parse(PROCESS_TEMPLATE, process)?,
            stage_out: CwlDocument::parse(STAGE_OUT_TEMPLATE, stage_out)?,
            descriptor: Descriptor::parse(DESCRIPTOR_TEMPLATE, descriptor)?,
        })
    }
}
