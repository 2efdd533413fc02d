//! Strict decimal integer parsing.

use serde_json::Value;
use std::num::IntErrorKind;

use crate::error::{Error, Result};

/// Parse an optionally signed run of decimal digits, optionally surrounded
/// by whitespace.
///
/// Empty input and any non-digit content are invalid arguments. Values
/// outside the `i64` range are overflows.
pub fn parse(input: &str) -> Result<i64> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(Error::validation_invalid_argument(
            "input",
            format!("'{}' length is zero", input),
            None,
            None,
        ));
    }

    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation_invalid_argument(
            "input",
            format!(
                "{} does not contain all digits, optionally prepended by a '+' or '-' and optionally surrounded by whitespace",
                trimmed
            ),
            None,
            None,
        ));
    }

    trimmed.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::NegOverflow => Error::numeric_overflow(
            trimmed,
            i64::MIN.to_string(),
            format!("{} was less than a min int of {}", trimmed, i64::MIN),
        ),
        _ => Error::numeric_overflow(
            trimmed,
            i64::MAX.to_string(),
            format!("{} was greater than a max int of {}", trimmed, i64::MAX),
        ),
    })
}

pub fn try_parse(input: &str) -> Option<i64> {
    parse(input).ok()
}

/// Integers pass through, strings are parsed, anything else is rejected.
pub fn from_value(value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            Error::validation_invalid_argument(
                "input",
                format!("{} was not an integer in range", n),
                None,
                None,
            )
        }),
        Value::String(s) => parse(s),
        other => Err(Error::validation_invalid_argument(
            "input",
            format!("{} was not an int or a string", other),
            None,
            None,
        )),
    }
}
