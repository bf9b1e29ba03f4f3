use serde_yaml::Value as YamlValue;
use tracing::{info, warn};

use crate::assembler::{
    DOWNLOAD_DIR_INPUT, PROCESS_CATALOG_OUTPUT, insert_absent, mapping_mut, missing, root_mapping,
    yaml_map,
};
use crate::config::ProcessConfig;
use crate::entrypoint::Entrypoint;
use crate::error::{AppPackError, Result};
use crate::params::{CwlType, Parameter, ParameterSet};
use crate::template::{PROCESS_TEMPLATE, ProcessDefinition};

/// Fills in the single-container process tool: invocation, container image,
/// argument inputs and staging inputs/outputs.
#[derive(Debug, Clone)]
pub struct ProcessAssembler {
    config: ProcessConfig,
}

impl ProcessAssembler {
    pub fn new(config: ProcessConfig) -> Self {
        Self { config }
    }

    pub fn assemble(
        &self,
        mut process: ProcessDefinition,
        params: &ParameterSet,
        entrypoint: &Entrypoint,
        container_ref: &str,
    ) -> Result<ProcessDefinition> {
        // Read before any mutation: the template's catalog glob is the only
        // source for the stage-out input default.
        let catalog_glob = match params.stage_out() {
            Some(_) => Some(self.catalog_glob(&process)?),
            None => None,
        };

        let root = process.value_mut();

        if let Entrypoint::Script(script) = entrypoint {
            let command = vec![
                YamlValue::from(self.config.shell_interpreter.as_str()),
                YamlValue::from(script.to_string_lossy().as_ref()),
                YamlValue::from(self.config.parameters_file.as_str()),
            ];
            root_mapping(root, PROCESS_TEMPLATE)?
                .insert("baseCommand".into(), YamlValue::Sequence(command));
        }

        mapping_mut(root, &["requirements", "DockerRequirement"], PROCESS_TEMPLATE)?
            .insert("dockerPull".into(), container_ref.into());

        let inputs = mapping_mut(root, &["inputs"], PROCESS_TEMPLATE)?;
        for arg in params.arguments() {
            let input = yaml_map([
                ("type", arg.cwl_type().as_str().into()),
                ("default", default_value(arg)),
            ]);
            insert_absent(inputs, arg.name(), input, "process inputs");
        }

        if let Some(stage_in) = params.stage_in() {
            insert_absent(
                inputs,
                stage_in.name(),
                self.config.stage_in_kind.as_str().into(),
                "process inputs",
            );
            insert_absent(
                inputs,
                DOWNLOAD_DIR_INPUT,
                CwlType::Directory.as_str().into(),
                "process inputs",
            );
        }

        match (params.stage_out(), catalog_glob) {
            (Some(stage_out), Some(glob)) => {
                let input = yaml_map([
                    ("type", CwlType::String.as_str().into()),
                    ("default", glob.into()),
                ]);
                insert_absent(inputs, stage_out.name(), input, "process inputs");
            }
            _ => {
                mapping_mut(root, &["outputs"], PROCESS_TEMPLATE)?.remove(PROCESS_CATALOG_OUTPUT);
            }
        }

        info!(
            container = container_ref,
            script = matches!(entrypoint, Entrypoint::Script(_)),
            "Assembled process"
        );
        Ok(process)
    }

    /// The glob of the process catalog-file output, checked for the runtime
    /// directory placeholder the container contract requires.
    fn catalog_glob(&self, process: &ProcessDefinition) -> Result<String> {
        let path = ["outputs", PROCESS_CATALOG_OUTPUT, "outputBinding", "glob"];
        let glob = process
            .get(&path)
            .and_then(YamlValue::as_str)
            .ok_or_else(|| missing(PROCESS_TEMPLATE, &path))?;

        if let Some(placeholder) = self.config.required_placeholder() {
            if !glob.contains(placeholder) {
                return Err(AppPackError::template_contract(
                    PROCESS_TEMPLATE,
                    format!(
                        "outputs.{}.outputBinding.glob `{}` must contain {}",
                        PROCESS_CATALOG_OUTPUT, glob, placeholder
                    ),
                ));
            }
        }
        Ok(glob.to_string())
    }
}

/// The parsed literal when the default is one, otherwise the source text.
fn default_value(param: &Parameter) -> YamlValue {
    match param.default() {
        Some(literal) => literal.to_yaml(),
        None => {
            warn!(
                parameter = param.name(),
                default = param.raw_default(),
                "Default is not a plain literal; emitting its source text"
            );
            YamlValue::String(param.raw_default().to_string())
        }
    }
}
