use apppack::params::{CwlType, Literal, Parameter, ParameterRecord, infer_cwl_type};

#[test]
fn test_alias_table_wins_over_default() {
    assert_eq!(infer_cwl_type("stage_in", "42"), CwlType::String);
    assert_eq!(infer_cwl_type("Stage-In", "anything"), CwlType::String);
    assert_eq!(infer_cwl_type("file", "1.0"), CwlType::File);
    assert_eq!(infer_cwl_type("stage-out", "'x'"), CwlType::File);
    assert_eq!(infer_cwl_type("INTEGER", "'x'"), CwlType::Int);
    assert_eq!(infer_cwl_type("bool", "3"), CwlType::Boolean);
    assert_eq!(infer_cwl_type("float", "'x'"), CwlType::Float);
    assert_eq!(infer_cwl_type("double", ""), CwlType::Double);
    assert_eq!(infer_cwl_type("Directory", ""), CwlType::Directory);
    assert_eq!(infer_cwl_type("any", "1"), CwlType::Any);
    assert_eq!(infer_cwl_type("NoneType", "None"), CwlType::Null);
}

#[test]
fn test_fallback_inspects_default_text() {
    assert_eq!(infer_cwl_type("bogus", "3.14"), CwlType::Float);
    assert_eq!(infer_cwl_type("bogus", "\"x\""), CwlType::String);
    assert_eq!(infer_cwl_type("bogus", "'single'"), CwlType::String);
    assert_eq!(infer_cwl_type("bogus", "x"), CwlType::Any);
    assert_eq!(infer_cwl_type("", "[1, 2]"), CwlType::Any);
}

#[test]
fn test_integer_default_without_hint_parses_as_float() {
    assert_eq!(infer_cwl_type("bogus", "30"), CwlType::Float);
}

#[test]
fn test_inference_is_deterministic() {
    let cases = [
        ("stage_in", "1"),
        ("bogus", "3.14"),
        ("bogus", "\"x\""),
        ("", ""),
        ("NoneType", "None"),
        ("weird", "1e5"),
    ];
    for (hint, default) in cases {
        assert_eq!(infer_cwl_type(hint, default), infer_cwl_type(hint, default));
    }
}

#[test]
fn test_cwl_type_tags() {
    assert_eq!(CwlType::File.as_str(), "File");
    assert_eq!(CwlType::Directory.to_string(), "Directory");
    assert_eq!(CwlType::Null.as_str(), "null");
    assert_eq!(CwlType::Boolean.as_str(), "boolean");
}

fn unhinted(name: &str, default: &str) -> Parameter {
    Parameter::from_record(ParameterRecord {
        name: name.to_string(),
        inferred_type_name: None,
        help: String::new(),
        default: default.to_string(),
    })
}

#[test]
fn test_oversized_integer_default_stays_int() {
    let param = unhinted("seed", "99999999999999999999");
    assert_eq!(param.cwl_type(), CwlType::Int);
    assert_eq!(
        param.default(),
        Some(&Literal::BigInt("99999999999999999999".to_string()))
    );
}

#[test]
fn test_misplaced_underscore_is_not_a_number() {
    let param = unhinted("scale", "1_e5");
    assert_eq!(param.default(), None);
    assert_eq!(param.cwl_type(), CwlType::Any);
}
