use apppack::assembler::WorkflowAssembler;
use apppack::error::AppPackError;
use apppack::params::{ParameterRecord, ParameterSet};
use apppack::template::{CwlDocument, TemplateSet};
use serde_yaml::Value;

fn record(name: &str, inferred: Option<&str>, help: &str, default: &str) -> ParameterRecord {
    ParameterRecord {
        name: name.to_string(),
        inferred_type_name: inferred.map(String::from),
        help: help.to_string(),
        default: default.to_string(),
    }
}

fn assemble(records: Vec<ParameterRecord>) -> CwlDocument {
    let templates = TemplateSet::builtin().expect("built-in templates parse");
    let params = ParameterSet::from_records(records).expect("valid parameter set");
    WorkflowAssembler::new()
        .assemble(templates.workflow, &params)
        .expect("workflow assembles")
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_argument_becomes_nullable_field() {
    let graph = assemble(vec![record("threshold", Some("float"), "", "0.5")]);

    let field = graph
        .get(&["inputs", "parameters", "type", "fields", "threshold"])
        .expect("threshold field");
    assert_eq!(field, &yaml("[\"null\", \"float\"]"));

    let binding = graph.get(&["steps", "process", "in", "threshold"]).unwrap();
    assert_eq!(
        binding,
        &yaml("source: parameters\nvalueFrom: $(self.threshold)")
    );
}

#[test]
fn test_outputs_are_reset() {
    let graph = assemble(vec![record("roi", None, "stage-in", "''")]);
    let outputs = graph.get(&["outputs"]).unwrap();
    assert!(outputs.as_mapping().unwrap().is_empty());
}

#[test]
fn test_without_stage_in_the_step_and_input_are_removed() {
    let graph = assemble(vec![record("n", Some("int"), "", "1")]);
    assert!(graph.get(&["steps", "stage_in"]).is_none());
    assert!(graph.get(&["inputs", "stage_in"]).is_none());
    assert!(graph.get(&["steps", "process", "in", "download_dir"]).is_none());
    assert!(graph.get(&["inputs", "cache_dir"]).is_none());
    assert!(graph.get(&["inputs", "cache_only"]).is_none());
}

#[test]
fn test_stage_in_is_wired_into_process() {
    let graph = assemble(vec![record("roi", None, "stage-in", "''")]);
    assert!(graph.get(&["steps", "stage_in"]).is_some());
    assert!(graph.get(&["inputs", "stage_in"]).is_some());
    assert_eq!(
        graph.get(&["steps", "process", "in", "download_dir"]),
        Some(&Value::from("stage_in/stage_in_download_dir"))
    );
    assert_eq!(
        graph.get(&["steps", "process", "in", "roi"]),
        Some(&Value::from("stage_in/stage_in_catalog_file"))
    );
    assert_eq!(
        graph.get(&["steps", "stage_in", "in", "cache_dir"]),
        Some(&Value::from("cache_dir"))
    );
    assert!(graph.get(&["inputs", "cache_only"]).is_some());
}

#[test]
fn test_without_stage_out_the_catalog_output_is_dropped() {
    let graph = assemble(vec![]);
    assert!(graph.get(&["steps", "stage_out"]).is_none());
    assert!(graph.get(&["inputs", "stage_out"]).is_none());
    let out = graph.get(&["steps", "process", "out"]).unwrap();
    assert_eq!(out, &yaml("[output_nb]"));
}

#[test]
fn test_stage_out_keeps_template_wiring() {
    let graph = assemble(vec![record("result", None, "stage-out", "\"out.json\"")]);
    assert!(graph.get(&["steps", "stage_out"]).is_some());
    assert!(graph.get(&["inputs", "stage_out"]).is_some());
    assert_eq!(
        graph.get(&["steps", "stage_out", "in", "catalog_file"]),
        Some(&Value::from("process/process_catalog_file"))
    );
    let out = graph.get(&["steps", "process", "out"]).unwrap();
    assert_eq!(out, &yaml("[output_nb, process_catalog_file]"));
}

#[test]
fn test_template_fields_are_not_overwritten() {
    let mut templates = TemplateSet::builtin().unwrap();
    let fields = templates
        .workflow
        .value_mut()
        .get_mut("inputs")
        .and_then(|i| i.get_mut("parameters"))
        .and_then(|p| p.get_mut("type"))
        .and_then(|t| t.get_mut("fields"))
        .unwrap();
    *fields = yaml("threshold: string");

    let params = ParameterSet::from_records(vec![record("threshold", Some("float"), "", "0.5")]).unwrap();
    let graph = WorkflowAssembler::new().assemble(templates.workflow, &params).unwrap();
    assert_eq!(
        graph.get(&["inputs", "parameters", "type", "fields", "threshold"]),
        Some(&Value::from("string"))
    );
}

#[test]
fn test_arguments_keep_declaration_order() {
    let graph = assemble(vec![
        record("zeta", Some("int"), "", "1"),
        record("alpha", Some("int"), "", "2"),
        record("mid", Some("bool"), "", "True"),
    ]);
    let fields = graph
        .get(&["inputs", "parameters", "type", "fields"])
        .and_then(Value::as_mapping)
        .unwrap();
    let names: Vec<&str> = fields.keys().filter_map(Value::as_str).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_missing_process_step_breaks_contract() {
    let workflow = CwlDocument::parse(
        "workflow.cwl",
        "inputs:\n  parameters:\n    type:\n      fields: {}\noutputs: {}\nsteps: {}\n",
    )
    .unwrap();
    let params = ParameterSet::from_records(vec![record("n", Some("int"), "", "1")]).unwrap();
    let err = WorkflowAssembler::new().assemble(workflow, &params).unwrap_err();
    match err {
        AppPackError::TemplateContract { template, detail } => {
            assert_eq!(template, "workflow.cwl");
            assert!(detail.contains("steps.process"), "{}", detail);
        }
        other => panic!("unexpected error: {}", other),
    }
}
