//! Splices classified notebook parameters into the CWL and descriptor
//! templates.

pub mod descriptor;
pub mod process;
pub mod staging;
pub mod workflow;

use serde_yaml::{Mapping, Value as YamlValue};
use tracing::warn;

use crate::error::{AppPackError, Result};

pub use descriptor::DescriptorAssembler;
pub use process::ProcessAssembler;
pub use staging::StagingAssembler;
pub use workflow::WorkflowAssembler;

pub const STEP_STAGE_IN: &str = "stage_in";
pub const STEP_PROCESS: &str = "process";
pub const STEP_STAGE_OUT: &str = "stage_out";
pub const PARAMETERS_INPUT: &str = "parameters";
pub const DOWNLOAD_DIR_INPUT: &str = "download_dir";
pub const CACHE_DIR_INPUT: &str = "cache_dir";
pub const CACHE_ONLY_INPUT: &str = "cache_only";
pub const STAGE_IN_CATALOG_OUTPUT: &str = "stage_in_catalog_file";
pub const STAGE_IN_DOWNLOAD_DIR_OUTPUT: &str = "stage_in_download_dir";
pub const PROCESS_CATALOG_OUTPUT: &str = "process_catalog_file";

/// Mutable mapping at `path` below `root`. A null leaf becomes an empty
/// mapping; any other missing or non-mapping node breaks the template
/// contract.
pub(crate) fn mapping_mut<'a>(
    root: &'a mut YamlValue,
    path: &[&str],
    template: &str,
) -> Result<&'a mut Mapping> {
    let mut node = root;
    for (depth, key) in path.iter().enumerate() {
        node = node
            .get_mut(*key)
            .ok_or_else(|| missing(template, &path[..=depth]))?;
    }
    if node.is_null() {
        *node = YamlValue::Mapping(Mapping::new());
    }
    node.as_mapping_mut().ok_or_else(|| {
        AppPackError::template_contract(template, format!("`{}` is not a mapping", path.join(".")))
    })
}

pub(crate) fn root_mapping<'a>(root: &'a mut YamlValue, template: &str) -> Result<&'a mut Mapping> {
    root.as_mapping_mut()
        .ok_or_else(|| AppPackError::template_contract(template, "document root is not a mapping"))
}

pub(crate) fn missing(template: &str, path: &[&str]) -> AppPackError {
    AppPackError::template_contract(template, format!("missing `{}`", path.join(".")))
}

/// Inserts `key` unless the template already defines it. A collision keeps
/// the template's value and is reported as a warning.
pub(crate) fn insert_absent(
    map: &mut Mapping,
    key: &str,
    value: YamlValue,
    location: &str,
) -> bool {
    if map.contains_key(key) {
        warn!(
            key,
            location, "Template already defines this key; keeping the template's definition"
        );
        return false;
    }
    map.insert(YamlValue::String(key.to_string()), value);
    true
}

/// Builds a YAML mapping from string keys, preserving order.
pub(crate) fn yaml_map<const N: usize>(entries: [(&str, YamlValue); N]) -> YamlValue {
    let mut map = Mapping::with_capacity(N);
    for (key, value) in entries {
        map.insert(YamlValue::String(key.to_string()), value);
    }
    YamlValue::Mapping(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_absent_keeps_existing() {
        let mut map = Mapping::new();
        map.insert("a".into(), "template".into());
        assert!(!insert_absent(&mut map, "a", "inferred".into(), "test"));
        assert!(insert_absent(&mut map, "b", "inferred".into(), "test"));
        assert_eq!(map.get("a"), Some(&YamlValue::from("template")));
        assert_eq!(map.get("b"), Some(&YamlValue::from("inferred")));
    }

    #[test]
    fn mapping_mut_reports_missing_path() {
        let mut root: YamlValue = serde_yaml::from_str("steps:\n  process: {}\n").unwrap();
        let err = mapping_mut(&mut root, &["steps", "stage_in", "in"], "workflow.cwl").unwrap_err();
        assert!(err.to_string().contains("steps.stage_in"), "{}", err);

        let mut root: YamlValue = serde_yaml::from_str("fields:\n").unwrap();
        assert!(mapping_mut(&mut root, &["fields"], "workflow.cwl").unwrap().is_empty());
    }
}
