//! Strict floating point parsing.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[+-]?0x[0-9a-f]+$").unwrap());

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap());

/// Parse a decimal number with optional sign, fraction and exponent.
///
/// Hex literals and anything non-numeric are unexpected values. A value too
/// large for `f64` is an overflow.
pub fn parse(input: &str) -> Result<f64> {
    let trimmed = input.trim();

    if HEX.is_match(trimmed) {
        return Err(Error::validation_unexpected_value(
            "input",
            Some(trimmed.to_string()),
            format!("{} is hex format", trimmed.to_lowercase()),
        ));
    }

    if !DECIMAL.is_match(trimmed) {
        return Err(Error::validation_unexpected_value(
            "input",
            Some(trimmed.to_string()),
            format!("{} is not numeric", trimmed),
        ));
    }

    let parsed: f64 = trimmed.parse().map_err(|_| {
        Error::validation_unexpected_value(
            "input",
            Some(trimmed.to_string()),
            format!("{} is not numeric", trimmed),
        )
    })?;

    if parsed.is_infinite() {
        return Err(Error::numeric_overflow(
            trimmed,
            f64::MAX.to_string(),
            format!("{} overflow", trimmed),
        ));
    }

    Ok(parsed)
}

pub fn try_parse(input: &str) -> Option<f64> {
    parse(input).ok()
}

/// Numbers pass through (integers widen), strings are parsed.
pub fn from_value(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            Error::validation_unexpected_value("input", Some(n.to_string()), "not representable")
        }),
        Value::String(s) => parse(s),
        other => Err(Error::validation_invalid_argument(
            "input",
            format!("{} was not a number or a string", other),
            None,
            None,
        )),
    }
}
