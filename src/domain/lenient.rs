//! Lenient decoding helpers for loosely typed service payloads.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a boolean flag.
///
/// Accepts booleans, numbers (non-zero is true) and the strings
/// `true`/`false`/`1`/`0`/`yes`/`no`.
#[must_use]
pub fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Interpret a JSON value as a float, accepting numeric strings.
#[must_use]
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Interpret a JSON value as display text; numbers are rendered, blanks are absent.
#[must_use]
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Serde adapter for flags that may arrive as `0`/`1` or `true`/`false`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(false);
    }
    flag(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid flag: {value}")))
}
