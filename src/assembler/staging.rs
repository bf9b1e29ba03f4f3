use tracing::debug;

use crate::assembler::{
    CACHE_ONLY_INPUT, PARAMETERS_INPUT, STAGE_IN_CATALOG_OUTPUT, STAGE_IN_DOWNLOAD_DIR_OUTPUT,
    STEP_PROCESS, STEP_STAGE_IN, STEP_STAGE_OUT, mapping_mut, missing, root_mapping, yaml_map,
};
use crate::config::StagingVariant;
use crate::error::Result;
use crate::params::ParameterSet;
use crate::template::{CwlDocument, WORKFLOW_TEMPLATE, WorkflowGraph};

/// Stage-in and stage-out tools are emitted as the templates define them.
/// The cache variant additionally derives a stage-in-only workflow.
#[derive(Debug, Clone)]
pub struct StagingAssembler {
    variant: StagingVariant,
}

impl StagingAssembler {
    pub fn new(variant: StagingVariant) -> Self {
        Self { variant }
    }

    pub fn stage_in(&self, template: &CwlDocument) -> CwlDocument {
        template.clone()
    }

    pub fn stage_out(&self, template: &CwlDocument) -> CwlDocument {
        template.clone()
    }

    /// A workflow that only runs the stage-in step with `cache_only` forced
    /// on, exposing the staged catalog and download directory as outputs.
    /// `None` outside the cache variant or when the notebook has no stage-in
    /// parameter.
    pub fn cache_workflow(
        &self,
        workflow: &WorkflowGraph,
        params: &ParameterSet,
    ) -> Result<Option<WorkflowGraph>> {
        if self.variant != StagingVariant::Cache || params.stage_in().is_none() {
            return Ok(None);
        }

        let mut cache = workflow.clone();
        let root = cache.value_mut();

        let steps = mapping_mut(root, &["steps"], WORKFLOW_TEMPLATE)?;
        steps.remove(STEP_PROCESS);
        steps.remove(STEP_STAGE_OUT);

        let inputs = mapping_mut(root, &["inputs"], WORKFLOW_TEMPLATE)?;
        inputs.remove(STEP_STAGE_OUT);
        let cache_only = inputs
            .get_mut(CACHE_ONLY_INPUT)
            .ok_or_else(|| missing(WORKFLOW_TEMPLATE, &["inputs", CACHE_ONLY_INPUT]))?;
        if !cache_only.is_mapping() {
            // shorthand `cache_only: boolean`
            let ty = cache_only.clone();
            *cache_only = yaml_map([("type", ty)]);
        }
        if let Some(cache_only) = cache_only.as_mapping_mut() {
            cache_only.insert("default".into(), true.into());
        }

        let fields = mapping_mut(
            root,
            &["inputs", PARAMETERS_INPUT, "type", "fields"],
            WORKFLOW_TEMPLATE,
        )?;
        for arg in params.arguments() {
            fields.remove(arg.name());
        }

        let outputs = yaml_map([
            (
                STAGE_IN_CATALOG_OUTPUT,
                yaml_map([
                    ("type", "File".into()),
                    ("outputSource", format!("{}/{}", STEP_STAGE_IN, STAGE_IN_CATALOG_OUTPUT).into()),
                ]),
            ),
            (
                STAGE_IN_DOWNLOAD_DIR_OUTPUT,
                yaml_map([
                    ("type", "Directory".into()),
                    (
                        "outputSource",
                        format!("{}/{}", STEP_STAGE_IN, STAGE_IN_DOWNLOAD_DIR_OUTPUT).into(),
                    ),
                ]),
            ),
        ]);
        root_mapping(root, WORKFLOW_TEMPLATE)?.insert("outputs".into(), outputs);

        debug!("Derived cache workflow");
        Ok(Some(cache))
    }
}
