use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CwlType {
    #[serde(rename = "string")]
    String,
    File,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    Directory,
    Any,
    #[serde(rename = "null")]
    Null,
}

impl CwlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CwlType::String => "string",
            CwlType::File => "File",
            CwlType::Int => "int",
            CwlType::Boolean => "boolean",
            CwlType::Float => "float",
            CwlType::Double => "double",
            CwlType::Directory => "Directory",
            CwlType::Any => "Any",
            CwlType::Null => "null",
        }
    }
}

impl fmt::Display for CwlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TYPE_ALIASES: &[(CwlType, &[&str])] = &[
    (CwlType::String, &["stage_in", "stage-in", "string"]),
    (CwlType::File, &["stage_out", "stage-out", "file"]),
    (CwlType::Int, &["int", "integer"]),
    (CwlType::Boolean, &["bool", "boolean"]),
    (CwlType::Float, &["float"]),
    (CwlType::Double, &["double"]),
    (CwlType::Directory, &["directory"]),
    (CwlType::Any, &["any"]),
    (CwlType::Null, &["nonetype"]),
];

/// Maps a parameter's type name and the literal text of its default onto a
/// CWL type tag.
///
/// The type name is matched case-insensitively against the alias table. When
/// nothing matches, the default text decides: anything quoted is a `string`,
/// anything that parses as a floating point number is a `float`, the rest is
/// `Any`.
pub fn infer_cwl_type(inferred_type_name: &str, raw_default: &str) -> CwlType {
    let name = inferred_type_name.trim().to_lowercase();
    for (tag, aliases) in TYPE_ALIASES {
        if aliases.contains(&name.as_str()) {
            return *tag;
        }
    }

    if raw_default.contains('"') || raw_default.contains('\'') {
        return CwlType::String;
    }
    if parses_as_float(raw_default) {
        return CwlType::Float;
    }
    CwlType::Any
}

/// Float conversion with the leniency of a float() constructor: surrounding
/// whitespace, a sign, exponents, `inf`/`nan` and digit-group underscores.
fn parses_as_float(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    match strip_digit_underscores(trimmed, 10) {
        Some(cleaned) => cleaned.parse::<f64>().is_ok(),
        None => false,
    }
}

/// Removes underscores that sit between two digits of `radix`. Returns
/// `None` when an underscore appears anywhere else.
pub(crate) fn strip_digit_underscores(text: &str, radix: u32) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == '_' {
            let before = i > 0 && chars[i - 1].is_digit(radix);
            let after = chars.get(i + 1).is_some_and(|n| n.is_digit(radix));
            if !(before && after) {
                return None;
            }
            continue;
        }
        out.push(*c);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscores_only_between_digits() {
        assert_eq!(strip_digit_underscores("1_000", 10).as_deref(), Some("1000"));
        assert_eq!(strip_digit_underscores("_1", 10), None);
        assert_eq!(strip_digit_underscores("1__0", 10), None);
        assert_eq!(strip_digit_underscores("1_e5", 10), None);
        assert_eq!(strip_digit_underscores("ff_ff", 16).as_deref(), Some("ffff"));
    }

    #[test]
    fn float_leniency() {
        assert!(parses_as_float(" 2.5 "));
        assert!(parses_as_float("-1e3"));
        assert!(parses_as_float("1_000.5"));
        assert!(!parses_as_float("1_e5"));
        assert!(!parses_as_float("x"));
        assert!(!parses_as_float(""));
    }
}
