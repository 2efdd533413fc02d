//! Strict boolean parsing.

use serde_json::Value;

use crate::error::{Error, Result};

/// Parse `"true"` or `"false"`, ignoring case and surrounding whitespace.
pub fn parse(input: &str) -> Result<bool> {
    let normalized = input.trim().to_lowercase();

    match normalized.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::validation_unexpected_value(
            "input",
            Some(input.to_string()),
            format!("{} is not 'true' or 'false' disregarding case", normalized),
        )),
    }
}

pub fn try_parse(input: &str) -> Option<bool> {
    parse(input).ok()
}

/// Booleans pass through, strings are parsed, anything else is rejected.
pub fn from_value(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => parse(s),
        other => Err(Error::validation_invalid_argument(
            "input",
            format!("{} was not a bool or a string", other),
            None,
            None,
        )),
    }
}
