//! Restricted parser for the literal text of a parameter default.
//!
//! Only numeric, string, boolean and null literals are accepted. Anything
//! else (names, calls, containers, arithmetic) is rejected rather than
//! evaluated.

use serde_yaml::Value as YamlValue;
use std::fmt;

use crate::params::types::strip_digit_underscores;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    /// Integer outside the `i64` range, kept as its decimal text.
    BigInt(String),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub text: String,
    pub reason: &'static str,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a supported literal: {}", self.text, self.reason)
    }
}

impl std::error::Error for LiteralError {}

impl Literal {
    /// Name of the value's type as the notebook's language reports it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) | Literal::BigInt(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "str",
            Literal::Bool(_) => "bool",
            Literal::None => "NoneType",
        }
    }

    pub fn to_yaml(&self) -> YamlValue {
        match self {
            Literal::Int(i) => YamlValue::from(*i),
            Literal::BigInt(digits) => match digits.parse::<u64>() {
                Ok(n) => YamlValue::Number(n.into()),
                Err(_) => YamlValue::String(digits.clone()),
            },
            Literal::Float(f) => YamlValue::from(*f),
            Literal::Str(s) => YamlValue::String(s.clone()),
            Literal::Bool(b) => YamlValue::Bool(*b),
            Literal::None => YamlValue::Null,
        }
    }
}

pub fn parse_literal(text: &str) -> Result<Literal, LiteralError> {
    let trimmed = text.trim();
    let fail = |reason| LiteralError {
        text: trimmed.to_string(),
        reason,
    };

    match trimmed {
        "" => return Err(fail("empty")),
        "True" => return Ok(Literal::Bool(true)),
        "False" => return Ok(Literal::Bool(false)),
        "None" => return Ok(Literal::None),
        _ => {}
    }

    if let Some(quote_at) = trimmed.find(['"', '\'']) {
        let prefix = &trimmed[..quote_at];
        let raw = match prefix {
            "" | "u" | "U" => false,
            "r" | "R" => true,
            _ => return Err(fail("unsupported string prefix")),
        };
        return parse_string(&trimmed[quote_at..], raw)
            .map(Literal::Str)
            .ok_or_else(|| fail("malformed string"));
    }

    parse_number(trimmed).ok_or_else(|| fail("not a number, string, boolean or None"))
}

fn parse_string(body: &str, raw: bool) -> Option<String> {
    let quote = body.chars().next()?;
    let triple: String = std::iter::repeat_n(quote, 3).collect();
    let delimiter = if body.len() >= 6 && body.starts_with(&triple) {
        triple
    } else {
        quote.to_string()
    };

    let inner = body
        .strip_prefix(delimiter.as_str())?
        .strip_suffix(delimiter.as_str())?;

    if raw {
        return Some(inner.to_string());
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if delimiter.len() == 1 && c == quote {
                // Unescaped closing quote in the middle: two adjacent literals.
                return None;
            }
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '\n' => {}
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            // Named escapes need the Unicode name table.
            'N' => return None,
            digit @ '0'..='7' => {
                let mut value = digit.to_digit(8)?;
                for _ in 0..2 {
                    match chars.clone().next().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Some(out)
}

/// Exactly `len` hex digits naming a code point.
fn hex_escape(chars: &mut std::str::Chars<'_>, len: usize) -> Option<char> {
    let digits: String = chars.by_ref().take(len).collect();
    if digits.len() != len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(&digits, 16).ok()?)
}

fn parse_number(text: &str) -> Option<Literal> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, text[1..].trim_start()),
        b'+' => (false, text[1..].trim_start()),
        _ => (false, text),
    };
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let radix = match unsigned.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        // `0x_1F` is allowed: one underscore may follow the prefix.
        let body = &unsigned[2..];
        let digits = strip_digit_underscores(body.strip_prefix('_').unwrap_or(body), radix)?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return integer(&digits, radix, negative);
    }

    let cleaned = strip_digit_underscores(unsigned, 10)?;
    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        return integer(&cleaned, 10, negative);
    }

    if cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        let value: f64 = cleaned.parse().ok()?;
        return Some(Literal::Float(if negative { -value } else { value }));
    }
    None
}

/// `digits` are already validated for `radix`, so a parse failure is an
/// overflow.
fn integer(digits: &str, radix: u32, negative: bool) -> Option<Literal> {
    match i128::from_str_radix(digits, radix) {
        Ok(value) => {
            let value = if negative { -value } else { value };
            Some(match i64::try_from(value) {
                Ok(small) => Literal::Int(small),
                Err(_) => Literal::BigInt(value.to_string()),
            })
        }
        Err(_) if radix == 10 => {
            let digits = digits.trim_start_matches('0');
            let sign = if negative { "-" } else { "" };
            Some(Literal::BigInt(format!("{}{}", sign, digits)))
        }
        Err(_) => None,
    }
}
