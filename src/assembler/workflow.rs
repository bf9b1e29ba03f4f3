use serde_yaml::{Mapping, Value as YamlValue};
use tracing::{debug, info};

use crate::assembler::{
    CACHE_DIR_INPUT, CACHE_ONLY_INPUT, DOWNLOAD_DIR_INPUT, PARAMETERS_INPUT, PROCESS_CATALOG_OUTPUT, STAGE_IN_CATALOG_OUTPUT,
    STAGE_IN_DOWNLOAD_DIR_OUTPUT, STEP_PROCESS, STEP_STAGE_IN, STEP_STAGE_OUT, insert_absent,
    mapping_mut, missing, root_mapping, yaml_map,
};
use crate::error::Result;
use crate::params::ParameterSet;
use crate::template::{WORKFLOW_TEMPLATE, WorkflowGraph};

/// Rewires the stage-in → process → stage-out workflow to the roles a
/// notebook actually declares.
#[derive(Debug, Clone, Default)]
pub struct WorkflowAssembler;

impl WorkflowAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, mut graph: WorkflowGraph, params: &ParameterSet) -> Result<WorkflowGraph> {
        let root = graph.value_mut();

        root_mapping(root, WORKFLOW_TEMPLATE)?.insert("outputs".into(), YamlValue::Mapping(Mapping::new()));

        self.wire_arguments(root, params)?;

        match params.stage_in() {
            Some(stage_in) => {
                let process_in = mapping_mut(root, &["steps", STEP_PROCESS, "in"], WORKFLOW_TEMPLATE)?;
                insert_absent(
                    process_in,
                    DOWNLOAD_DIR_INPUT,
                    format!("{}/{}", STEP_STAGE_IN, STAGE_IN_DOWNLOAD_DIR_OUTPUT).into(),
                    "workflow steps.process.in",
                );
                insert_absent(
                    process_in,
                    stage_in.name(),
                    format!("{}/{}", STEP_STAGE_IN, STAGE_IN_CATALOG_OUTPUT).into(),
                    "workflow steps.process.in",
                );
            }
            None => {
                debug!("No stage-in parameter; removing the stage_in step");
                remove_step(root, STEP_STAGE_IN)?;
                let inputs = mapping_mut(root, &["inputs"], WORKFLOW_TEMPLATE)?;
                inputs.remove(CACHE_DIR_INPUT);
                inputs.remove(CACHE_ONLY_INPUT);
            }
        }

        if params.stage_out().is_none() {
            debug!("No stage-out parameter; removing the stage_out step");
            remove_step(root, STEP_STAGE_OUT)?;

            let process_out = root
                .get_mut("steps")
                .and_then(|steps| steps.get_mut(STEP_PROCESS))
                .and_then(|process| process.get_mut("out"))
                .and_then(YamlValue::as_sequence_mut)
                .ok_or_else(|| missing(WORKFLOW_TEMPLATE, &["steps", STEP_PROCESS, "out"]))?;
            process_out.retain(|out| out.as_str() != Some(PROCESS_CATALOG_OUTPUT));
        }

        info!(
            arguments = params.arguments().count(),
            stage_in = params.stage_in().is_some(),
            stage_out = params.stage_out().is_some(),
            "Assembled workflow"
        );
        Ok(graph)
    }

    /// Each argument becomes a nullable field of the `parameters` record and
    /// a `process` step input pulled out of that record.
    fn wire_arguments(&self, root: &mut YamlValue, params: &ParameterSet) -> Result<()> {
        let fields = mapping_mut(
            root,
            &["inputs", PARAMETERS_INPUT, "type", "fields"],
            WORKFLOW_TEMPLATE,
        )?;
        for arg in params.arguments() {
            let nullable = YamlValue::Sequence(vec!["null".into(), arg.cwl_type().as_str().into()]);
            insert_absent(fields, arg.name(), nullable, "workflow inputs.parameters");
        }

        let process_in = mapping_mut(root, &["steps", STEP_PROCESS, "in"], WORKFLOW_TEMPLATE)?;
        for arg in params.arguments() {
            let binding = yaml_map([
                ("source", PARAMETERS_INPUT.into()),
                ("valueFrom", format!("$(self.{})", arg.name()).into()),
            ]);
            insert_absent(process_in, arg.name(), binding, "workflow steps.process.in");
        }
        Ok(())
    }
}

/// Drops a step together with the top-level input block of the same name.
fn remove_step(root: &mut YamlValue, step: &str) -> Result<()> {
    mapping_mut(root, &["steps"], WORKFLOW_TEMPLATE)?.remove(step);
    mapping_mut(root, &["inputs"], WORKFLOW_TEMPLATE)?.remove(step);
    Ok(())
}
