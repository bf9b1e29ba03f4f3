use serde_json::{Map, Value as JsonValue, json};
use tracing::info;

use crate::error::{AppPackError, Result};
use crate::params::ParameterSet;
use crate::repo::RepoIdentity;
use crate::output::WORKFLOW_FILE;
use crate::template::{DESCRIPTOR_TEMPLATE, Descriptor};

const ARGUMENT_TITLE: &str = "Automatically detected using papermill.";
const STAGE_IN_TITLE: &str = "Stage-in input specified for URL-to-PATH conversion.";
const STAGE_OUT_TITLE: &str = "Automatically detected from .ipynb parsing.";
const STAGE_IN_DATA_TYPE: &str = "stage_in";
const STAGE_OUT_MIME_TYPE: &str = "text/*";
const CONTAINER_SCHEME: &str = "docker://";

#[derive(Debug, Clone)]
pub struct DescriptorAssembler {
    deposit_url: String,
    deposit_branch: String,
}

impl DescriptorAssembler {
    pub fn new(deposit_url: impl Into<String>, deposit_branch: impl Into<String>) -> Self {
        Self {
            deposit_url: deposit_url.into(),
            deposit_branch: deposit_branch.into(),
        }
    }

    pub fn workflow_url(&self, repo_name: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.deposit_url.trim_end_matches('/'),
            self.deposit_branch,
            repo_name,
            WORKFLOW_FILE
        )
    }

    pub fn assemble(
        &self,
        mut descriptor: Descriptor,
        params: &ParameterSet,
        repo: &RepoIdentity,
        container_ref: &str,
    ) -> Result<Descriptor> {
        let root = descriptor.value_mut();

        let process = object_mut(root, &["processDescription", "process"])?;
        process.insert("id".to_string(), json!(repo.process_id()));
        process.insert("title".to_string(), json!(repo.commit_message.trim()));

        let mut inputs: Vec<JsonValue> = params
            .arguments()
            .map(|arg| {
                json!({
                    "id": arg.name(),
                    "title": ARGUMENT_TITLE,
                    "literalDataDomains": [{"dataType": {"name": arg.cwl_type().as_str()}}],
                })
            })
            .collect();
        if let Some(stage_in) = params.stage_in() {
            inputs.push(json!({
                "id": stage_in.name(),
                "title": STAGE_IN_TITLE,
                "literalDataDomains": [{"dataType": {"name": STAGE_IN_DATA_TYPE}}],
            }));
        }
        process.insert("inputs".to_string(), JsonValue::Array(inputs));

        let outputs: Vec<JsonValue> = params
            .stage_out()
            .map(|stage_out| {
                json!({
                    "id": stage_out.name(),
                    "title": STAGE_OUT_TITLE,
                    "output": {
                        "formats": [{"mimeType": STAGE_OUT_MIME_TYPE, "default": true}],
                    },
                })
            })
            .into_iter()
            .collect();
        process.insert("outputs".to_string(), JsonValue::Array(outputs));

        object_mut(root, &["processDescription", "process", "owsContext", "offering", "content"])?
            .insert("href".to_string(), json!(self.workflow_url(&repo.name)));

        let execution_unit = root
            .get_mut("executionUnit")
            .and_then(JsonValue::as_array_mut)
            .and_then(|units| units.first_mut())
            .and_then(JsonValue::as_object_mut)
            .ok_or_else(|| {
                AppPackError::template_contract(
                    DESCRIPTOR_TEMPLATE,
                    "executionUnit must be a non-empty list of objects",
                )
            })?;
        execution_unit.insert(
            "href".to_string(),
            json!(format!("{}{}", CONTAINER_SCHEME, container_ref)),
        );

        info!(process_id = %repo.process_id(), "Assembled descriptor");
        Ok(descriptor)
    }
}

fn object_mut<'a>(root: &'a mut JsonValue, path: &[&str]) -> Result<&'a mut Map<String, JsonValue>> {
    let pointer: String = path.iter().map(|key| format!("/{}", key)).collect();
    root.pointer_mut(&pointer)
        .and_then(JsonValue::as_object_mut)
        .ok_or_else(|| {
            AppPackError::template_contract(
                DESCRIPTOR_TEMPLATE,
                format!("`{}` must be an object", path.join(".")),
            )
        })
}
