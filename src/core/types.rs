//! Runtime type assertions over JSON values.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static NUMERIC_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$").unwrap()
});

/// Type names accepted by [`throw_if_not_type`].
pub const TYPE_NAMES: &[&str] = &[
    "bool", "null", "string", "array", "callable", "double", "float", "int", "integer", "long",
    "numeric", "object", "real", "resource", "scalar",
];

/// Check every value against the type name it is listed under.
///
/// `array` accepts lists and objects, `object` only objects, `numeric`
/// numbers and numeric strings, `scalar` bools, numbers and strings.
/// `callable` and `resource` match nothing a JSON value can hold. With
/// `fail_on_whitespace`, blank strings fail the `string` check. With
/// `allow_nulls`, null passes every check.
pub fn throw_if_not_type(
    types_to_values: &[(&str, &[Value])],
    fail_on_whitespace: bool,
    allow_nulls: bool,
) -> Result<()> {
    for (type_name, values) in types_to_values {
        check_type(type_name, values, fail_on_whitespace, allow_nulls)?;
    }
    Ok(())
}

fn check_type(
    type_name: &str,
    values: &[Value],
    fail_on_whitespace: bool,
    allow_nulls: bool,
) -> Result<()> {
    if !TYPE_NAMES.contains(&type_name) {
        return Err(Error::validation_invalid_argument(
            "type",
            "a type was not one of the is_ functions",
            Some(type_name.to_string()),
            Some(TYPE_NAMES.iter().map(|t| t.to_string()).collect()),
        ));
    }

    for (i, value) in values.iter().enumerate() {
        if type_name == "null" {
            if !value.is_null() {
                return Err(position_error(i, "was not null"));
            }
            continue;
        }

        if allow_nulls && value.is_null() {
            continue;
        }

        if type_name == "string" {
            if let Value::String(s) = value {
                if fail_on_whitespace && s.trim().is_empty() {
                    return Err(position_error(i, "was whitespace"));
                }
                continue;
            }
        }

        if matches_type(type_name, value) {
            continue;
        }

        if type_name == "bool" {
            return Err(position_error(i, "was not a boolean"));
        }
        return Err(position_error(i, &format!("was not a '{}'", type_name)));
    }

    Ok(())
}

fn matches_type(type_name: &str, value: &Value) -> bool {
    match type_name {
        "bool" => value.is_boolean(),
        "string" => value.is_string(),
        "array" => value.is_array() || value.is_object(),
        "object" => value.is_object(),
        "int" | "integer" | "long" => value.is_i64() || value.is_u64(),
        "float" | "double" | "real" => value.is_f64(),
        "numeric" => match value {
            Value::Number(_) => true,
            Value::String(s) => NUMERIC_STRING.is_match(s),
            _ => false,
        },
        "scalar" => value.is_boolean() || value.is_number() || value.is_string(),
        _ => false,
    }
}

fn position_error(position: usize, problem: &str) -> Error {
    Error::validation_invalid_argument(
        position.to_string(),
        format!("variable at position '{}' {}", position, problem),
        None,
        None,
    )
}
