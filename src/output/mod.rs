//! Serialization of generated artifacts.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppPackError, Result};
use crate::template::{CwlDocument, Descriptor};

pub const WORKFLOW_FILE: &str = "workflow.cwl";
pub const STAGE_IN_FILE: &str = "stage_in.cwl";
pub const CACHE_WORKFLOW_FILE: &str = "cache_workflow.cwl";
pub const PROCESS_FILE: &str = "process.cwl";
pub const STAGE_OUT_FILE: &str = "stage_out.cwl";
pub const DESCRIPTOR_FILE: &str = "applicationDescriptor.json";

pub const CWL_SHEBANG: &str = "#!/usr/bin/env cwl-runner\n";

/// Shebang line followed by the block-style YAML body.
pub fn render_cwl(name: &str, document: &CwlDocument) -> Result<String> {
    let body = serde_yaml::to_string(document.value()).map_err(|e| AppPackError::Serialization {
        artifact: name.to_string(),
        detail: e.to_string(),
    })?;
    Ok(format!("{}{}", CWL_SHEBANG, body))
}

/// JSON with 4-space indentation, keys in template order.
pub fn render_descriptor(name: &str, descriptor: &Descriptor) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    descriptor
        .value()
        .serialize(&mut serializer)
        .map_err(|e| AppPackError::Serialization {
            artifact: name.to_string(),
            detail: e.to_string(),
        })?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| AppPackError::Serialization {
        artifact: name.to_string(),
        detail: e.to_string(),
    })
}

/// One rendered file of an application package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub contents: String,
}

impl Artifact {
    pub fn new(file_name: &'static str, contents: String) -> Self {
        Self {
            file_name,
            contents,
        }
    }

    pub fn write_to(&self, outdir: &Path) -> Result<PathBuf> {
        let path = outdir.join(self.file_name);
        fs::write(&path, &self.contents)?;
        debug!(path = %path.display(), bytes = self.contents.len(), "Wrote artifact");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_uses_four_space_indent() {
        let descriptor = Descriptor::new(json!({"b": {"c": 1}, "a": 2}));
        let text = render_descriptor(DESCRIPTOR_FILE, &descriptor).unwrap();
        assert_eq!(text, "{\n    \"b\": {\n        \"c\": 1\n    },\n    \"a\": 2\n}\n");
    }

    #[test]
    fn cwl_starts_with_shebang() {
        let doc = CwlDocument::parse("x.cwl", "cwlVersion: v1.2\nclass: CommandLineTool\n").unwrap();
        let text = render_cwl("x.cwl", &doc).unwrap();
        assert_eq!(text, "#!/usr/bin/env cwl-runner\ncwlVersion: v1.2\nclass: CommandLineTool\n");
    }
}
