use anyhow::{Context as AnyhowContext, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::template::{
    DESCRIPTOR_TEMPLATE, PROCESS_TEMPLATE, STAGE_IN_TEMPLATE, STAGE_OUT_TEMPLATE, TemplateSet,
    WORKFLOW_TEMPLATE,
};

/// Loads the five templates from `dir`, which must hold all of
/// `workflow.cwl`, `stage_in.cwl`, `process.cwl`, `stage_out.cwl` and
/// `app_desc.json`.
pub fn load_templates_from_dir(dir: &Path) -> Result<TemplateSet> {
    let read = |name: &str| {
        let path = dir.join(name);
        debug!(template = %path.display(), "Reading template");
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template from {}", path.display()))
    };

    let workflow = read(WORKFLOW_TEMPLATE)?;
    let stage_in = read(STAGE_IN_TEMPLATE)?;
    let process = read(PROCESS_TEMPLATE)?;
    let stage_out = read(STAGE_OUT_TEMPLATE)?;
    let descriptor = read(DESCRIPTOR_TEMPLATE)?;

    let templates = TemplateSet::parse(&workflow, &stage_in, &process, &stage_out, &descriptor)
        .with_context(|| format!("Failed to deserialize templates in {}", dir.display()))?;
    Ok(templates)
}

/// Templates from `dir` when given, otherwise the built-in set.
pub fn load_templates(dir: Option<&Path>) -> Result<TemplateSet> {
    match dir {
        Some(dir) => load_templates_from_dir(dir),
        None => TemplateSet::builtin().context("Built-in templates are malformed"),
    }
}
