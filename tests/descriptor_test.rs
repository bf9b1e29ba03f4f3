use apppack::assembler::DescriptorAssembler;
use apppack::config::DEFAULT_DEPOSIT_URL;
use apppack::params::{ParameterRecord, ParameterSet};
use apppack::repo::RepoIdentity;
use apppack::template::{Descriptor, TemplateSet};
use serde_json::json;

const IMAGE: &str = "ghcr.io/unity-sds/algorithms:unity-sds.sample.abc1234";

fn record(name: &str, inferred: Option<&str>, help: &str, default: &str) -> ParameterRecord {
    ParameterRecord {
        name: name.to_string(),
        inferred_type_name: inferred.map(String::from),
        help: help.to_string(),
        default: default.to_string(),
    }
}

fn identity(owner: Option<&str>) -> RepoIdentity {
    RepoIdentity {
        owner: owner.map(String::from),
        name: "sample".to_string(),
        commit_short_id: "abc1234".to_string(),
        commit_message: "  Tune the resolution sweep\n".to_string(),
    }
}

fn assembler() -> DescriptorAssembler {
    DescriptorAssembler::new(DEFAULT_DEPOSIT_URL, "main")
}

fn assemble(records: Vec<ParameterRecord>, repo: &RepoIdentity) -> Descriptor {
    let templates = TemplateSet::builtin().expect("built-in templates parse");
    let params = ParameterSet::from_records(records).expect("valid parameter set");
    assembler()
        .assemble(templates.descriptor, &params, repo, IMAGE)
        .expect("descriptor assembles")
}

#[test]
fn test_process_id_and_title() {
    let descriptor = assemble(vec![], &identity(Some("unity-sds")));
    let process = &descriptor.value()["processDescription"]["process"];
    assert_eq!(process["id"], json!("unity-sds.sample.abc1234"));
    assert_eq!(process["title"], json!("Tune the resolution sweep"));

    let descriptor = assemble(vec![], &identity(None));
    assert_eq!(
        descriptor.value()["processDescription"]["process"]["id"],
        json!("sample.abc1234")
    );
}

#[test]
fn test_workflow_location_url() {
    let descriptor = assemble(vec![], &identity(Some("unity-sds")));
    assert_eq!(
        descriptor.value()["processDescription"]["process"]["owsContext"]["offering"]["content"]["href"],
        json!("https://raw.githubusercontent.com/jplzhan/artifact-deposit-repo/main/sample/workflow.cwl")
    );

    let custom = DescriptorAssembler::new("https://example.org/deposit/", "develop");
    assert_eq!(
        custom.workflow_url("sample"),
        "https://example.org/deposit/develop/sample/workflow.cwl"
    );
}

#[test]
fn test_input_and_output_blocks() {
    let descriptor = assemble(
        vec![
            record("resolution", None, "", "30"),
            record("roi", None, "stage-in", "''"),
            record("result", None, "stage-out", "'out.json'"),
        ],
        &identity(Some("unity-sds")),
    );
    let process = &descriptor.value()["processDescription"]["process"];

    let inputs = process["inputs"].as_array().unwrap();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0]["id"], json!("resolution"));
    assert_eq!(inputs[0]["title"], json!("Automatically detected using papermill."));
    assert_eq!(
        inputs[0]["literalDataDomains"][0]["dataType"]["name"],
        json!("int")
    );
    assert_eq!(inputs[1]["id"], json!("roi"));
    assert_eq!(
        inputs[1]["literalDataDomains"][0]["dataType"]["name"],
        json!("stage_in")
    );

    let outputs = process["outputs"].as_array().unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0]["id"], json!("result"));
    assert_eq!(
        outputs[0]["output"]["formats"][0],
        json!({"mimeType": "text/*", "default": true})
    );
}

#[test]
fn test_no_output_block_without_stage_out() {
    let descriptor = assemble(
        vec![record("threshold", Some("float"), "", "0.5")],
        &identity(None),
    );
    let process = &descriptor.value()["processDescription"]["process"];
    assert_eq!(process["inputs"].as_array().unwrap().len(), 1);
    assert!(process["outputs"].as_array().unwrap().is_empty());
}

#[test]
fn test_execution_unit_reference() {
    let descriptor = assemble(vec![], &identity(None));
    assert_eq!(
        descriptor.value()["executionUnit"][0]["href"],
        json!(format!("docker://{}", IMAGE))
    );
    assert_eq!(descriptor.value()["executionUnit"][0]["type"], json!("docker"));
}

#[test]
fn test_template_key_order_is_preserved() {
    let descriptor = assemble(vec![], &identity(None));
    let keys: Vec<&String> = descriptor.value().as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        [
            "processDescription",
            "immediateDeployment",
            "executionUnit",
            "deploymentProfileName"
        ]
    );
}

#[test]
fn test_missing_execution_unit_breaks_contract() {
    let descriptor = Descriptor::new(json!({
        "processDescription": {"process": {"owsContext": {"offering": {"content": {}}}}},
        "executionUnit": []
    }));
    let err = assembler()
        .assemble(descriptor, &ParameterSet::new(), &identity(None), IMAGE)
        .unwrap_err();
    assert!(err.to_string().contains("executionUnit"), "{}", err);
}
