//! Helpers over JSON collections.
//!
//! A collection is either a JSON array (keys are the indices, rendered as
//! strings) or an object. Results that are keyed come back as a list when
//! their keys are exactly `0..n` in order, and as an object otherwise.

use heck::ToLowerCamelCase;
use serde_json::{Map, Value};
use std::ops::BitOr;

use crate::error::{Error, Result};

/// Which keys to copy and what to call them in the destination.
#[derive(Debug, Clone, Copy)]
pub enum KeyMap<'a> {
    /// Copy each key under its own name.
    Same(&'a [&'a str]),
    /// `(destination key, source key)` pairs.
    Renamed(&'a [(&'a str, &'a str)]),
}

impl<'a> KeyMap<'a> {
    fn pairs(&self) -> Vec<(&'a str, &'a str)> {
        match *self {
            KeyMap::Same(keys) => keys.iter().map(|k| (*k, *k)).collect(),
            KeyMap::Renamed(pairs) => pairs.to_vec(),
        }
    }
}

/// What `extract` does when two rows produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateBehavior {
    TakeFirst,
    #[default]
    TakeLast,
    Throw,
}

impl std::str::FromStr for DuplicateBehavior {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "takeFirst" | "take-first" => Ok(Self::TakeFirst),
            "takeLast" | "take-last" => Ok(Self::TakeLast),
            "throw" => Ok(Self::Throw),
            other => Err(Error::validation_invalid_argument(
                "duplicateBehavior",
                "duplicateBehavior was not 'takeFirst', 'takeLast', or 'throw'",
                Some(other.to_string()),
                Some(vec![
                    "takeFirst".to_string(),
                    "takeLast".to_string(),
                    "throw".to_string(),
                ]),
            )),
        }
    }
}

/// Key case conversions for [`change_key_case`]. Flags combine with `|`;
/// they apply in the order underscore, camel caps, upper, lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCase(u8);

impl KeyCase {
    pub const LOWER: KeyCase = KeyCase(1);
    pub const UPPER: KeyCase = KeyCase(2);
    pub const CAMEL_CAPS: KeyCase = KeyCase(4);
    pub const UNDERSCORE: KeyCase = KeyCase(8);

    pub fn contains(self, other: KeyCase) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Self {
        KeyCase(bits & 0b1111)
    }
}

impl BitOr for KeyCase {
    type Output = KeyCase;

    fn bitor(self, rhs: KeyCase) -> KeyCase {
        KeyCase(self.0 | rhs.0)
    }
}

impl Default for KeyCase {
    fn default() -> Self {
        KeyCase::LOWER
    }
}

// =============================================================================
// Collection plumbing
// =============================================================================

/// Key/value pairs of an array or object, `None` for scalars.
fn entries(value: &Value) -> Option<Vec<(String, &Value)>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        ),
        Value::Object(map) => Some(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
        _ => None,
    }
}

fn child<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn is_collection(value: &Value) -> bool {
    value.is_array() || value.is_object()
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Map::new(),
    }
}

/// A list when the keys are `0..n` in order, an object otherwise.
pub fn to_collection(map: Map<String, Value>) -> Value {
    let sequential = map
        .keys()
        .enumerate()
        .all(|(i, key)| key.parse::<usize>().ok() == Some(i));

    if sequential {
        Value::Array(map.into_iter().map(|(_, v)| v).collect())
    } else {
        Value::Object(map)
    }
}

fn not_a_collection(field: &str, problem: &str) -> Error {
    Error::validation_invalid_argument(field, problem, None, None)
}

// =============================================================================
// Lookup
// =============================================================================

/// Value at `key`, or `default` when the key is absent. A present null is
/// returned as null.
pub fn get(collection: &Value, key: &str, default: Value) -> Value {
    child(collection, key).cloned().unwrap_or(default)
}

/// Value at `key` unless it is absent or null.
pub fn get_if_set(collection: &Value, key: &str, default: Value) -> Value {
    match child(collection, key) {
        Some(value) if !value.is_null() => value.clone(),
        _ => default,
    }
}

pub fn try_get<'v>(collection: &'v Value, key: &str) -> Option<&'v Value> {
    child(collection, key)
}

/// First value under `keys` that is present and not null.
pub fn get_first_set(collection: &Value, keys: &[&str], default: Value) -> Value {
    keys.iter()
        .filter_map(|key| child(collection, key))
        .find(|value| !value.is_null())
        .cloned()
        .unwrap_or(default)
}

// =============================================================================
// Copying
// =============================================================================

/// Copy the mapped keys that exist in `source` into `dest`.
pub fn copy_if_keys_exist(source: &Map<String, Value>, dest: &mut Map<String, Value>, key_map: KeyMap) {
    for (dest_key, source_key) in key_map.pairs() {
        if let Some(value) = source.get(source_key) {
            dest.insert(dest_key.to_string(), value.clone());
        }
    }
}

/// Like [`copy_if_keys_exist`] but skips null values.
pub fn copy_if_set(source: &Map<String, Value>, dest: &mut Map<String, Value>, key_map: KeyMap) {
    for (dest_key, source_key) in key_map.pairs() {
        match source.get(source_key) {
            Some(value) if !value.is_null() => {
                dest.insert(dest_key.to_string(), value.clone());
            }
            _ => {}
        }
    }
}

/// `template` with every key that also exists in `source` taking the
/// source's value. Keys only in `source` are ignored.
pub fn fill_if_keys_exist(template: &Map<String, Value>, source: &Map<String, Value>) -> Map<String, Value> {
    template
        .iter()
        .map(|(key, value)| {
            let filled = source.get(key).unwrap_or(value);
            (key.clone(), filled.clone())
        })
        .collect()
}

// =============================================================================
// Projection and filtering
// =============================================================================

/// The `key` value of every item, keyed like `input`.
///
/// With `strict_key_check`, an item without `key` is an error; otherwise
/// that item is skipped.
pub fn project(input: &Value, key: &str, strict_key_check: bool) -> Result<Value> {
    let items = entries(input).ok_or_else(|| not_a_collection("input", "input was not an array"))?;

    let mut projection = Map::new();
    for (item_key, item) in items {
        if !is_collection(item) {
            return Err(not_a_collection("input", "a value in input was not an array"));
        }

        match child(item, key) {
            Some(value) => {
                projection.insert(item_key, value.clone());
            }
            None if strict_key_check => {
                return Err(Error::validation_invalid_argument(
                    "key",
                    "key was not in one of the input arrays",
                    Some(key.to_string()),
                    None,
                ));
            }
            None => {}
        }
    }

    Ok(to_collection(projection))
}

/// Items whose values equal every condition. Comparison is strict: `0`,
/// `0.0`, `"0"` and `false` are all different.
pub fn where_matches(input: &Value, conditions: &Map<String, Value>) -> Result<Vec<Value>> {
    let items = entries(input).ok_or_else(|| not_a_collection("array", "array was not an array"))?;

    let mut result = Vec::new();
    for (_, item) in items {
        if !is_collection(item) {
            return Err(not_a_collection("array", "a value in array was not an array"));
        }

        let matches = conditions
            .iter()
            .all(|(key, expected)| child(item, key) == Some(expected));
        if matches {
            result.push(item.clone());
        }
    }

    Ok(result)
}

// =============================================================================
// Merging
// =============================================================================

/// `a` overlaid with `b`, key by key. Where both sides hold an object the
/// two are merged recursively; otherwise `b`'s value wins, null included.
/// Keys keep their first position in `a`, new keys from `b` follow.
pub fn merge(a: &Map<String, Value>, b: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = a.clone();
    for (key, value) in b {
        match (merged.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                *existing = merge(existing, incoming);
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

/// Store each item of `items` under `field_name` in the destination entry
/// with the same key, creating entries as needed.
///
/// An existing `field_name` is only replaced with `overwrite`.
pub fn embed_into(items: &Value, field_name: &str, destination: Value, overwrite: bool) -> Result<Value> {
    let items = entries(items).ok_or_else(|| not_a_collection("items", "items was not an array"))?;
    let mut destination = into_map(destination);

    for (key, item) in items {
        match destination.get_mut(&key) {
            Some(existing) => {
                if !is_collection(existing) {
                    return Err(not_a_collection(
                        "destination",
                        "a value in destination was not an array",
                    ));
                }

                let mut target = into_map(existing.take());
                if !overwrite && target.contains_key(field_name) {
                    return Err(Error::failure(
                        "fieldName key already exists in a destination array",
                    ));
                }
                target.insert(field_name.to_string(), item.clone());
                *existing = to_collection(target);
            }
            None => {
                let mut entry = Map::new();
                entry.insert(field_name.to_string(), item.clone());
                destination.insert(key, Value::Object(entry));
            }
        }
    }

    Ok(to_collection(destination))
}

/// Build a map from two columns of a list of rows: `key_index` supplies the
/// key and `value_index` the value (null when the row lacks it).
pub fn extract(
    rows: &Value,
    key_index: &str,
    value_index: &str,
    duplicate_behavior: DuplicateBehavior,
) -> Result<Map<String, Value>> {
    let rows = entries(rows).ok_or_else(|| {
        not_a_collection("arrays", "arrays was not a multi-dimensional array")
    })?;

    let mut result = Map::new();
    for (position, row) in rows {
        if !is_collection(row) {
            return Err(not_a_collection(
                "arrays",
                "arrays was not a multi-dimensional array",
            ));
        }

        let key = match child(row, key_index) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            other => {
                return Err(Error::validation_unexpected_value(
                    format!("arrays[{}][{}]", position, key_index),
                    other.map(|v| v.to_string()),
                    format!(
                        "Value for arrays[{}][{}] was not a string or integer",
                        position, key_index
                    ),
                ));
            }
        };

        let value = child(row, value_index).cloned().unwrap_or(Value::Null);

        if result.contains_key(&key) {
            match duplicate_behavior {
                DuplicateBehavior::TakeFirst => continue,
                DuplicateBehavior::Throw => {
                    return Err(Error::failure(format!("Duplicate entry for '{}' found.", key)));
                }
                DuplicateBehavior::TakeLast => {}
            }
        }

        result.insert(key, value);
    }

    Ok(result)
}

/// Split `input` into at most `partition_count` consecutive chunks whose
/// sizes differ by at most one, larger chunks first.
///
/// List chunks are re-indexed unless `preserve_keys`; object chunks always
/// keep their keys.
pub fn partition(input: &Value, partition_count: i64, preserve_keys: bool) -> Result<Vec<Value>> {
    if partition_count <= 0 {
        return Err(Error::validation_invalid_argument(
            "partitionCount",
            "partitionCount must be a positive integer",
            Some(partition_count.to_string()),
            None,
        ));
    }

    let items = entries(input).ok_or_else(|| not_a_collection("input", "input was not an array"))?;
    let keep_keys = preserve_keys || input.is_object();

    let total = items.len();
    let count = usize::try_from(partition_count).unwrap_or(usize::MAX).min(total);
    if count == 0 {
        return Ok(Vec::new());
    }

    let base = total / count;
    let remainder = total % count;

    let mut chunks = Vec::with_capacity(count);
    let mut iter = items.into_iter();
    for index in 0..count {
        let size = base + usize::from(index < remainder);
        let chunk: Vec<(String, &Value)> = iter.by_ref().take(size).collect();

        let chunk = if keep_keys {
            Value::Object(chunk.into_iter().map(|(k, v)| (k, v.clone())).collect())
        } else {
            Value::Array(chunk.into_iter().map(|(_, v)| v.clone()).collect())
        };
        chunks.push(chunk);
    }

    Ok(chunks)
}

// =============================================================================
// In-place edits
// =============================================================================

/// Remove every listed key. Missing keys are ignored; order of the
/// remaining entries is kept.
pub fn unset_all(map: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        map.shift_remove(*key);
    }
}

/// Replace strings that are empty after trimming with null. Only the top
/// level of `collection` is touched.
pub fn nullify_empty_strings(collection: &mut Value) {
    let values: Box<dyn Iterator<Item = &mut Value> + '_> = match collection {
        Value::Array(items) => Box::new(items.iter_mut()),
        Value::Object(map) => Box::new(map.values_mut()),
        _ => return,
    };

    for value in values {
        if value.as_str().is_some_and(|s| s.trim().is_empty()) {
            *value = Value::Null;
        }
    }
}

/// Copy of `input` with every key converted per `case`.
pub fn change_key_case(input: &Map<String, Value>, case: KeyCase) -> Map<String, Value> {
    input
        .iter()
        .map(|(key, value)| (convert_key(key, case), value.clone()))
        .collect()
}

fn convert_key(key: &str, case: KeyCase) -> String {
    let mut key = key.to_string();

    if case.contains(KeyCase::UNDERSCORE) {
        key = underscore_before_capitals(&key);
    }
    if case.contains(KeyCase::CAMEL_CAPS) {
        key = key.to_lower_camel_case();
    }
    if case.contains(KeyCase::UPPER) {
        key = key.to_uppercase();
    }
    if case.contains(KeyCase::LOWER) {
        key = key.to_lowercase();
    }

    key
}

/// `firstAndLastName` -> `first_And_Last_Name`. Case is left alone.
fn underscore_before_capitals(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn merge_nested_and_null_overrides() {
        let one = obj(json!({
            "a": "foo",
            "b": "bar",
            "c": {"A": 1, "B": 2},
            "d": null,
            "e": 123,
        }));
        let two = obj(json!({
            "b": "baz",
            "c": {"A": 1, "C": 3},
            "d": "foo",
            "e": null,
        }));

        let merged = merge(&one, &two);

        assert_eq!(
            Value::Object(merged.clone()),
            json!({"a": "foo", "b": "baz", "c": {"A": 1, "B": 2, "C": 3}, "d": "foo", "e": null})
        );
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn merge_replaces_object_with_scalar() {
        let merged = merge(&obj(json!({"c": {"A": 1}})), &obj(json!({"c": [1, 2], "z": {}})));
        assert_eq!(Value::Object(merged), json!({"c": [1, 2], "z": {}}));
    }

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn get_returns_default_only_when_absent() {
        let array = json!({"a": "foo", "b": null});
        assert_eq!(get(&array, "a", Value::Null), json!("foo"));
        assert_eq!(get(&array, "b", json!("bar")), Value::Null);
        assert_eq!(get(&array, "c", json!("baz")), json!("baz"));
    }

    #[test]
    fn get_if_set_skips_nulls() {
        let array = json!({"a": "foo", "b": null});
        assert_eq!(get_if_set(&array, "a", Value::Null), json!("foo"));
        assert_eq!(get_if_set(&array, "b", json!("bar")), json!("bar"));
        assert_eq!(get_if_set(&array, "c", Value::Null), Value::Null);
    }

    #[test]
    fn try_get_by_index() {
        let list = json!([1.1, 2.2]);
        assert_eq!(try_get(&list, "0"), Some(&json!(1.1)));
        assert_eq!(try_get(&list, "5"), None);
        assert_eq!(try_get(&json!({}), "a"), None);
    }

    #[test]
    fn get_first_set_with_default() {
        let list = json!(["foo", null, "bar"]);
        assert_eq!(get_first_set(&list, &["1", "2"], Value::Null), json!("bar"));
        assert_eq!(get_first_set(&list, &["1", "4"], json!("baz")), json!("baz"));
    }

    #[test]
    fn copy_if_keys_exist_renamed() {
        let source = obj(json!({"a": "foo", "b": "bar"}));
        let mut dest = Map::new();
        copy_if_keys_exist(&source, &mut dest, KeyMap::Renamed(&[("foo", "a"), ("bar", "b")]));
        assert_eq!(Value::Object(dest), json!({"foo": "foo", "bar": "bar"}));
    }

    #[test]
    fn copy_if_keys_exist_same_names() {
        let source = obj(json!({"a": "foo", "b": "bar", "d": "baz"}));
        let mut dest = Map::new();
        copy_if_keys_exist(&source, &mut dest, KeyMap::Same(&["a", "b", "c"]));
        assert_eq!(Value::Object(dest), json!({"a": "foo", "b": "bar"}));
    }

    #[test]
    fn copy_if_set_skips_nulls() {
        let source = obj(json!({"a": "foo", "b": null, "d": "baz"}));
        let mut dest = Map::new();
        copy_if_set(
            &source,
            &mut dest,
            KeyMap::Renamed(&[("alpha", "a"), ("beta", "b"), ("charlie", "c"), ("delta", "d")]),
        );
        assert_eq!(Value::Object(dest), json!({"alpha": "foo", "delta": "baz"}));
    }

    #[test]
    fn fill_if_keys_exist_keeps_template_keys() {
        let template = obj(json!({"a": null, "b": null, "c": null, "d": null, "e": null}));
        let source = obj(json!({"a": 1, "c": 1, "e": 1, "z": 9}));
        let filled = fill_if_keys_exist(&template, &source);
        assert_eq!(
            Value::Object(filled),
            json!({"a": 1, "b": null, "c": 1, "d": null, "e": 1})
        );
    }

    #[test]
    fn project_preserves_keys() {
        let input = json!({"0": {"key1": 1, "key2": 2}, "boo": {"key1": 3, "key2": 4}});
        assert_eq!(project(&input, "key2", true).unwrap(), json!({"0": 2, "boo": 4}));

        let list = json!([{"key2": 2}, {"key2": 4}]);
        assert_eq!(project(&list, "key2", true).unwrap(), json!([2, 4]));
    }

    #[test]
    fn project_strict_key_failure() {
        let input = json!([{"key1": 1, "key2": 2}, {"key1": 3}]);
        let err = project(&input, "key2", true).unwrap_err();
        assert_eq!(err.message, "key was not in one of the input arrays");
    }

    #[test]
    fn project_lenient_skips_missing() {
        let input = json!([{"key1": 1}, {"key1": 3, "key2": 4}]);
        assert_eq!(project(&input, "key2", false).unwrap(), json!({"1": 4}));
    }

    #[test]
    fn project_rejects_scalar_items() {
        let err = project(&json!([1]), "key", true).unwrap_err();
        assert_eq!(err.message, "a value in input was not an array");
    }

    #[test]
    fn where_is_strict() {
        let people = json!([
            {"name": "Tom", "score": "0"},
            {"name": "Dick", "score": 0},
            {"name": "Harry", "score": 0.0},
            {"name": "Jane"},
        ]);
        let conditions = obj(json!({"score": 0}));
        assert_eq!(
            where_matches(&people, &conditions).unwrap(),
            vec![json!({"name": "Dick", "score": 0})]
        );

        let conditions = obj(json!({"score": false}));
        assert!(where_matches(&people, &conditions).unwrap().is_empty());
    }

    #[test]
    fn where_with_multiple_conditions() {
        let people = json!([
            {"name": "Tom", "score": 1, "extra": "abc"},
            {"name": "Dick", "score": 1, "extra": false},
            {"name": "Dick", "score": 0, "extra": 123},
        ]);
        let conditions = obj(json!({"name": "Dick", "score": 1}));
        assert_eq!(
            where_matches(&people, &conditions).unwrap(),
            vec![json!({"name": "Dick", "score": 1, "extra": false})]
        );
    }

    #[test]
    fn where_rejects_scalar_items() {
        assert!(where_matches(&json!([1]), &Map::new()).is_err());
    }

    #[test]
    fn embed_into_existing_rows() {
        let result = embed_into(
            &json!([{"exception": "exception 1"}, {"exception": "exception 2"}]),
            "result",
            json!([{"request": {"image": "foo"}}, {"request": {"image": "bar"}}]),
            false,
        )
        .unwrap();
        assert_eq!(
            result,
            json!([
                {"request": {"image": "foo"}, "result": {"exception": "exception 1"}},
                {"request": {"image": "bar"}, "result": {"exception": "exception 2"}},
            ])
        );
    }

    #[test]
    fn embed_into_empty_destination() {
        let result = embed_into(&json!([{"image": "foo"}, {"image": "bar"}]), "request", json!([]), false)
            .unwrap();
        assert_eq!(result, json!([{"request": {"image": "foo"}}, {"request": {"image": "bar"}}]));
    }

    #[test]
    fn embed_into_errors() {
        let err = embed_into(&json!({"one": 0}), "result", json!({"one": 0}), false).unwrap_err();
        assert_eq!(err.message, "a value in destination was not an array");

        let err = embed_into(&json!(["new"]), "result", json!([{"result": "old"}]), false).unwrap_err();
        assert_eq!(err.code, ErrorCode::GenericFailure);
    }

    #[test]
    fn embed_into_overwrite_and_no_items() {
        assert_eq!(
            embed_into(&json!([true]), "key", json!([{"key": false}]), true).unwrap(),
            json!([{"key": true}])
        );
        assert_eq!(
            embed_into(&json!([]), "result", json!([{"result": "foo"}]), false).unwrap(),
            json!([{"result": "foo"}])
        );
    }

    fn extract_rows() -> Value {
        json!([
            {"key": "foo", "value": "bar", "extra": "abc"},
            {"extra": 123, "key": "baz", "value": "fez"},
            {"value": "duplicate1", "extra": true, "key": "boo"},
            {"extra": true, "key": "noValue"},
            {"value": "duplicate2", "extra": true, "key": "boo"},
        ])
    }

    #[test]
    fn extract_take_last_by_default() {
        let result = extract(&extract_rows(), "key", "value", DuplicateBehavior::default()).unwrap();
        assert_eq!(
            Value::Object(result),
            json!({"foo": "bar", "baz": "fez", "boo": "duplicate2", "noValue": null})
        );
    }

    #[test]
    fn extract_take_first() {
        let result = extract(&extract_rows(), "key", "value", DuplicateBehavior::TakeFirst).unwrap();
        assert_eq!(result["boo"], json!("duplicate1"));
    }

    #[test]
    fn extract_throw_on_duplicate() {
        let err = extract(&extract_rows(), "key", "value", DuplicateBehavior::Throw).unwrap_err();
        assert_eq!(err.message, "Duplicate entry for 'boo' found.");
    }

    #[test]
    fn extract_requires_rows() {
        let err = extract(&json!({"key": "foo", "value": "bar"}), "key", "value", DuplicateBehavior::TakeLast)
            .unwrap_err();
        assert_eq!(err.message, "arrays was not a multi-dimensional array");
    }

    #[test]
    fn extract_rejects_non_scalar_keys() {
        let rows = json!([{"key": "foo", "value": "bar"}, {"key": [], "value": "fez"}]);
        let err = extract(&rows, "key", "value", DuplicateBehavior::Throw).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationUnexpectedValue);
        assert_eq!(err.message, "Value for arrays[1][key] was not a string or integer");
    }

    #[test]
    fn duplicate_behavior_from_str() {
        assert_eq!("takeFirst".parse::<DuplicateBehavior>().unwrap(), DuplicateBehavior::TakeFirst);
        assert!("invalid".parse::<DuplicateBehavior>().is_err());
    }

    #[test]
    fn partition_front_loads_remainder() {
        let cases = [
            (json!(["a", "b", "c"]), 3, json!([["a"], ["b"], ["c"]])),
            (json!(["a", "b", "c"]), 4, json!([["a"], ["b"], ["c"]])),
            (json!(["a", "b", "c", "d"]), 3, json!([["a", "b"], ["c"], ["d"]])),
            (json!(["a", "b", "c", "d", "e"]), 3, json!([["a", "b"], ["c", "d"], ["e"]])),
            (json!(["a", "b", "c"]), 1, json!([["a", "b", "c"]])),
            (json!([]), 2, json!([])),
        ];
        for (input, count, expected) in cases {
            assert_eq!(Value::Array(partition(&input, count, false).unwrap()), expected);
        }
    }

    #[test]
    fn partition_rejects_non_positive_count() {
        for count in [0, -1] {
            let err = partition(&json!(["a"]), count, false).unwrap_err();
            assert_eq!(err.message, "partitionCount must be a positive integer");
        }
    }

    #[test]
    fn partition_preserves_keys() {
        assert_eq!(
            partition(&json!(["a", "b", "c", "d", "e"]), 3, true).unwrap(),
            vec![json!({"0": "a", "1": "b"}), json!({"2": "c", "3": "d"}), json!({"4": "e"})]
        );
        assert_eq!(
            partition(&json!({"a": 0, "b": 1, "c": 2, "d": 3, "e": 4}), 3, false).unwrap(),
            vec![json!({"a": 0, "b": 1}), json!({"c": 2, "d": 3}), json!({"e": 4})]
        );
    }

    #[test]
    fn unset_all_ignores_missing_keys() {
        let mut map = obj(json!({"0": "a", "1": "b", "2": "c"}));
        unset_all(&mut map, &["0", "2", "7"]);
        assert_eq!(Value::Object(map), json!({"1": "b"}));

        let mut map = obj(json!({"a": 1}));
        unset_all(&mut map, &[]);
        assert_eq!(Value::Object(map), json!({"a": 1}));
    }

    #[test]
    fn nullify_empty_strings_top_level() {
        let mut value = json!({"a": "", "b": true, "c": "\n\t", "d": "\tstring with whitespace\n"});
        nullify_empty_strings(&mut value);
        assert_eq!(
            value,
            json!({"a": null, "b": true, "c": null, "d": "\tstring with whitespace\n"})
        );

        let mut empty = json!([]);
        nullify_empty_strings(&mut empty);
        assert_eq!(empty, json!([]));
    }

    #[test]
    fn change_key_case_combinations() {
        let lower_underscore = obj(json!({"first_and_last_name": "John Doe", "email_address": "john@example.com", "age": 35}));
        let upper_underscore = obj(json!({"FIRST_AND_LAST_NAME": "John Doe", "EMAIL_ADDRESS": "john@example.com", "AGE": 35}));
        let camel_caps = obj(json!({"firstAndLastName": "John Doe", "emailAddress": "john@example.com", "age": 35}));
        let underscore = obj(json!({"first_And_Last_Name": "John Doe", "email_Address": "john@example.com", "age": 35}));
        let lower = obj(json!({"firstandlastname": "John Doe", "emailaddress": "john@example.com", "age": 35}));
        let upper = obj(json!({"FIRSTANDLASTNAME": "John Doe", "EMAILADDRESS": "john@example.com", "AGE": 35}));

        let cases = [
            (&upper, KeyCase::LOWER, &lower),
            (&lower, KeyCase::UPPER, &upper),
            (&lower_underscore, KeyCase::CAMEL_CAPS, &camel_caps),
            (&camel_caps, KeyCase::UNDERSCORE, &underscore),
            (&camel_caps, KeyCase::UNDERSCORE | KeyCase::UPPER, &upper_underscore),
            (&camel_caps, KeyCase::UNDERSCORE | KeyCase::LOWER, &lower_underscore),
            (&lower_underscore, KeyCase::CAMEL_CAPS | KeyCase::UPPER, &upper),
        ];
        for (input, case, expected) in cases {
            assert_eq!(&change_key_case(input, case), expected, "case {:?}", case);
        }
    }
}
