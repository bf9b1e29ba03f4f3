//! Static inspection of a notebook's parameters cell.
//!
//! Each top-level assignment becomes one [`ParameterRecord`]:
//!
//! ```text
//! name[: annotation] = value  [# type: T] [# help text]
//! ```
//!
//! A value may continue over several lines; a continuation line is any line
//! without an `=` following an assignment.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::notebook::Notebook;
use crate::params::ParameterRecord;

static PARAMETER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<target>\w[\w_]*)\s*(:\s*["']?(?P<annotation>\w[\w_\[\],\s]*)["']?\s*)?=\s*(?P<value>.*?)(\s*#\s*(type:\s*(?P<type_comment>[^\s]*)\s*)?(?P<help>.*))?$"#,
    )
    .expect("parameter pattern compiles")
});

/// Records for every parameter of `notebook`, in declaration order. A
/// notebook without a parameters cell has no parameters.
pub fn inspect_notebook(notebook: &Notebook) -> Vec<ParameterRecord> {
    notebook
        .parameters_source()
        .map(|source| inspect_source(&source))
        .unwrap_or_default()
}

pub fn inspect_source(source: &str) -> Vec<ParameterRecord> {
    let mut definitions = Vec::new();
    let mut accumulator: Vec<&str> = Vec::new();

    for (line_no, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let equals = line.matches('=').count();
        if equals > 0 {
            definitions.push(flatten(&accumulator));
            accumulator.clear();
            if equals > 1 {
                warn!(line = line_no + 1, "Unable to parse parameter line '{}'", line);
                continue;
            }
        }
        accumulator.push(line);
    }
    definitions.push(flatten(&accumulator));

    definitions
        .iter()
        .filter(|d| !d.is_empty())
        .filter_map(|definition| {
            let caps = PARAMETER_PATTERN.captures(definition)?;
            let target = caps.name("target")?.as_str().trim().to_string();
            let inferred_type_name = caps
                .name("annotation")
                .or_else(|| caps.name("type_comment"))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
            Some(ParameterRecord {
                name: target,
                inferred_type_name,
                help: caps
                    .name("help")
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default(),
                default: caps
                    .name("value")
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Joins a multi-line definition, dropping trailing comments from every line
/// but the last.
fn flatten(lines: &[&str]) -> String {
    let Some((last, head)) = lines.split_last() else {
        return String::new();
    };
    let mut flat = String::new();
    for line in head {
        let code = line.split('#').next().unwrap_or_default();
        flat.push_str(code.trim());
    }
    flat.push_str(last.trim());
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_strips_inner_comments() {
        assert_eq!(flatten(&["x = [1,  # one", "  2]"]), "x = [1,2]");
        assert_eq!(flatten(&[]), "");
    }

    #[test]
    fn parameter_pattern_compiles_and_captures() {
        let pattern = LazyLock::force(&PARAMETER_PATTERN);
        let caps = pattern
            .captures("roi: str = 's3://b/k'  # type: stage-in")
            .expect("assignment matches");
        assert_eq!(&caps["target"], "roi");
        assert_eq!(caps["annotation"].trim(), "str");
        assert_eq!(&caps["type_comment"], "stage-in");
        assert!(pattern.captures("# just a comment").is_none());
    }
}
