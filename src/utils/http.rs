//! Raw HTTP header parsing and query string building/parsing.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::string::ucwords;
use crate::types::throw_if_not_type;

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n[\t ]+").unwrap());

static FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^:]+): (.+)").unwrap());

static REQUEST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+) +([^ ]+) +HTTP/([0-9.]+)").unwrap());

static STATUS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HTTP/([0-9.]+) +([0-9]{3}) +(.*)").unwrap());

static KEY_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s-]").unwrap());

pub const REQUEST_METHOD: &str = "Request Method";
pub const REQUEST_URL: &str = "Request Url";
pub const RESPONSE_CODE: &str = "Response Code";
pub const RESPONSE_STATUS: &str = "Response Status";

/// `content-type` -> `Content-Type`
fn canonical_header_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let spaced = KEY_BREAK.replace_all(&lowered, " ");
    ucwords(&spaced, " ").replace(' ', "-")
}

/// Parse a raw CRLF-separated header block.
///
/// Folded lines are unfolded first. Field names are canonicalized and a
/// repeated name collects its values into a list in order of appearance. A
/// request line adds `Request Method` and `Request Url`; a status line adds
/// `Response Code` (a number) and `Response Status`.
pub fn parse_headers(raw: &str) -> Result<Map<String, Value>> {
    throw_if_not_type(&[("string", &[Value::String(raw.to_string())])], true, false)?;

    let unfolded = CONTINUATION.replace_all(raw.trim(), " ");

    let mut headers = Map::new();
    for field in unfolded.split("\r\n") {
        if let Some(caps) = FIELD.captures(field) {
            let name = canonical_header_name(&caps[1]);
            let value = Value::String(caps[2].trim().to_string());

            match headers.get_mut(&name) {
                None => {
                    headers.insert(name, value);
                }
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        } else if let Some(caps) = REQUEST_LINE.captures(field) {
            headers.insert(REQUEST_METHOD.to_string(), Value::String(caps[1].trim().to_string()));
            headers.insert(REQUEST_URL.to_string(), Value::String(caps[2].trim().to_string()));
        } else if let Some((code, status)) = STATUS_LINE
            .captures(field)
            .and_then(|caps| Some((caps[2].parse::<i64>().ok()?, caps[3].trim().to_string())))
        {
            headers.insert(RESPONSE_CODE.to_string(), Value::from(code));
            headers.insert(RESPONSE_STATUS.to_string(), Value::String(status));
        } else {
            return Err(unsupported_header(field));
        }
    }

    Ok(headers)
}

fn unsupported_header(field: &str) -> Error {
    Error::failure("Unable to parse headers")
        .with_previous(Error::failure(format!("Unsupported header format: {}", field)))
}

fn query_value(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(urlencoding::encode(s).into_owned()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(urlencoding::encode(&n.to_string()).into_owned()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(Error::validation_invalid_argument(
            name,
            format!("value of '{}' nests a collection inside a list", name),
            None,
            None,
        )),
    }
}

/// Build `name=value` pairs joined by `&`. A list (or object) value repeats
/// the name once per element. Names and values are percent-encoded with
/// `%20` for spaces.
pub fn build_query_string(params: &Map<String, Value>) -> Result<String> {
    let mut pairs = Vec::new();

    for (name, value) in params {
        let encoded_name = urlencoding::encode(name);
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{}={}", encoded_name, query_value(name, item)?));
                }
            }
            Value::Object(items) => {
                for item in items.values() {
                    pairs.push(format!("{}={}", encoded_name, query_value(name, item)?));
                }
            }
            scalar => pairs.push(format!("{}={}", encoded_name, query_value(name, scalar)?)),
        }
    }

    Ok(pairs.join("&"))
}

/// Query component of `url`: after the first `?`, before any `#`.
fn query_component(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once('?')?;
    let query = rest.split_once('#').map_or(rest, |(query, _)| query);
    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

/// Decoded `(name, value)` pairs in order. A pair without `=` has an
/// empty value; everything after the first `=` is the value.
fn query_pairs(url: &str) -> Vec<(String, String)> {
    let Some(query) = query_component(url) else {
        return Vec::new();
    };

    query
        .split('&')
        .map(|arg| {
            let (name, value) = arg.split_once('=').unwrap_or((arg, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

/// Every query parameter mapped to the list of its values, except names in
/// `collapsed_params`, which map to their single value.
///
/// A collapsed name that appears more than once is an error.
pub fn get_query_params(url: &str, collapsed_params: &[&str]) -> Result<Map<String, Value>> {
    let collapsed: HashSet<&str> = collapsed_params.iter().copied().collect();
    let mut result = Map::new();

    for (name, value) in query_pairs(url) {
        if collapsed.contains(name.as_str()) {
            if result.contains_key(&name) {
                return Err(Error::failure(format!(
                    "Parameter '{}' had more than one value but in collapsedParams",
                    name
                )));
            }
            result.insert(name, Value::String(value));
            continue;
        }

        match result.get_mut(&name) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            _ => {
                result.insert(name, Value::Array(vec![Value::String(value)]));
            }
        }
    }

    Ok(result)
}

/// Every query parameter mapped to its single value. Names listed in
/// `expected_array_params` may repeat and then map to the list of their
/// values; any other repeated name is an error.
pub fn get_query_params_collapsed(url: &str, expected_array_params: &[&str]) -> Result<Map<String, Value>> {
    let mut result = Map::new();

    for (name, value) in query_pairs(url) {
        let value = Value::String(value);

        let Some(existing) = result.get_mut(&name) else {
            result.insert(name, value);
            continue;
        };

        if !expected_array_params.contains(&name.as_str()) {
            return Err(Error::failure(format!(
                "Parameter '{}' is not expected to be an array, but array given",
                name
            )));
        }

        match existing {
            Value::Array(values) => values.push(value),
            single => {
                let first = single.take();
                *single = Value::Array(vec![first, value]);
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn parse_headers_basic() {
        let headers = parse_headers("Content-Type: text/json").unwrap();
        assert_eq!(Value::Object(headers), json!({"Content-Type": "text/json"}));
    }

    #[test]
    fn parse_headers_malformed() {
        let err = parse_headers("&some\r\nbad+headers").unwrap_err();
        assert_eq!(err.code, ErrorCode::GenericFailure);
        assert_eq!(err.message, "Unable to parse headers");
        assert_eq!(
            err.previous.as_ref().map(|p| p.message.as_str()),
            Some("Unsupported header format: &some")
        );
    }

    #[test]
    fn parse_headers_status_code_must_be_ascii_digits() {
        let err = parse_headers("HTTP/1.1 ١٢٣ OK").unwrap_err();
        assert_eq!(err.message, "Unable to parse headers");
        assert_eq!(
            err.previous.as_ref().map(|p| p.message.as_str()),
            Some("Unsupported header format: HTTP/1.1 ١٢٣ OK")
        );

        assert!(parse_headers("GET /x HTTP/١.1").is_err());
    }

    #[test]
    fn parse_headers_blank_is_invalid() {
        let err = parse_headers(" \r\n ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
    }

    #[test]
    fn parse_headers_response_block() {
        let raw = "HTTP/1.1 200 OK\r\n\
                   content-type: text/html; charset=UTF-8\r\n\
                   Server: Funky/1.0\r\n\
                   Set-Cookie: foo=bar\r\n\
                   Set-Cookie: baz=quux\r\n\
                   Set-Cookie: key=value\r\n";
        let headers = parse_headers(raw).unwrap();

        let keys: Vec<&str> = headers.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["Response Code", "Response Status", "Content-Type", "Server", "Set-Cookie"]
        );
        assert_eq!(
            Value::Object(headers),
            json!({
                "Response Code": 200,
                "Response Status": "OK",
                "Content-Type": "text/html; charset=UTF-8",
                "Server": "Funky/1.0",
                "Set-Cookie": ["foo=bar", "baz=quux", "key=value"],
            })
        );
    }

    #[test]
    fn parse_headers_request_block() {
        let raw = "GET /file.xml HTTP/1.1\r\nHost: www.example.com\r\nAccept: */*\r\n";
        let headers = parse_headers(raw).unwrap();
        assert_eq!(
            Value::Object(headers),
            json!({
                "Request Method": "GET",
                "Request Url": "/file.xml",
                "Host": "www.example.com",
                "Accept": "*/*",
            })
        );
    }

    #[test]
    fn parse_headers_unfolds_continuations() {
        let raw = "X-Long-Header: first part\r\n\t second part\r\nx_custom  name: v";
        let headers = parse_headers(raw).unwrap();
        assert_eq!(headers["X-Long-Header"], json!("first part second part"));
        assert_eq!(headers["X_custom--Name"], json!("v"));
    }

    #[test]
    fn build_query_string_basic() {
        let params = obj(json!({
            "foo": "bar",
            "baz": "boom",
            "cow": "milk",
            "lang": "hypertext processor",
            "theFalse": false,
            "theTrue": true,
        }));
        assert_eq!(
            build_query_string(&params).unwrap(),
            "foo=bar&baz=boom&cow=milk&lang=hypertext%20processor&theFalse=false&theTrue=true"
        );
    }

    #[test]
    fn build_query_string_multi_value() {
        let params = obj(json!({"param1": ["value", "another value"], "param2": "a value"}));
        assert_eq!(
            build_query_string(&params).unwrap(),
            "param1=value&param1=another%20value&param2=a%20value"
        );
    }

    #[test]
    fn build_query_string_complex_values() {
        let params = obj(json!({"a b c": ["1$2(3", "4)5*6"]}));
        assert_eq!(
            build_query_string(&params).unwrap(),
            "a%20b%20c=1%242%283&a%20b%20c=4%295%2A6"
        );
    }

    #[test]
    fn build_query_string_rejects_nested_lists() {
        let params = obj(json!({"a": [[1]]}));
        assert!(build_query_string(&params).is_err());
    }

    #[test]
    fn get_query_params_normal() {
        let url = "http://foo.com/bar/?otherStuff=green&stuff=yeah&moreStuff=rock&moreStuff=jazz&otherStuff=blue&otherStuff=black";
        assert_eq!(
            Value::Object(get_query_params(url, &[]).unwrap()),
            json!({
                "otherStuff": ["green", "blue", "black"],
                "stuff": ["yeah"],
                "moreStuff": ["rock", "jazz"],
            })
        );
    }

    #[test]
    fn get_query_params_empty_parameter() {
        let url = "http://foo.com/bar/?stuff=yeah&moreStuff=&moreStuff=jazz&otherStuff";
        assert_eq!(
            Value::Object(get_query_params(url, &[]).unwrap()),
            json!({"stuff": ["yeah"], "moreStuff": ["", "jazz"], "otherStuff": [""]})
        );
    }

    #[test]
    fn get_query_params_without_query() {
        assert!(get_query_params("GARBAGE", &[]).unwrap().is_empty());
        assert!(get_query_params("http://foo.com/?", &[]).unwrap().is_empty());
        assert!(get_query_params_collapsed("GARBAGE", &[]).unwrap().is_empty());
    }

    #[test]
    fn get_query_params_collapsed_names() {
        let url = "http://foo.com/bar/?stuff=yeah&moreStuff=mhmm";
        assert_eq!(
            Value::Object(get_query_params(url, &["stuff", "notThere"]).unwrap()),
            json!({"stuff": "yeah", "moreStuff": ["mhmm"]})
        );
    }

    #[test]
    fn get_query_params_collapsed_name_repeated() {
        let url = "http://foo.com/bar/?stuff=yeah&stuff=boy&moreStuff=mhmm";
        let err = get_query_params(url, &["stuff"]).unwrap_err();
        assert_eq!(
            err.message,
            "Parameter 'stuff' had more than one value but in collapsedParams"
        );
    }

    #[test]
    fn get_query_params_decodes() {
        let url = "http://foo.com/?a+b=c%20d&e=%E2%9C%93#frag";
        assert_eq!(
            Value::Object(get_query_params(url, &[]).unwrap()),
            json!({"a b": ["c d"], "e": ["✓"]})
        );
    }

    #[test]
    fn collapsed_expected_arrays() {
        let url = "http://foo.com/bar/?boo=1&foo=bar&boo=2";
        assert_eq!(
            Value::Object(get_query_params_collapsed(url, &["boo"]).unwrap()),
            json!({"boo": ["1", "2"], "foo": "bar"})
        );
    }

    #[test]
    fn collapsed_unexpected_array() {
        let url = "http://foo.com/bar/?boo=1&foo=bar&boo=2";
        let err = get_query_params_collapsed(url, &[]).unwrap_err();
        assert_eq!(
            err.message,
            "Parameter 'boo' is not expected to be an array, but array given"
        );
    }

    #[test]
    fn collapsed_empty_parameter() {
        let url = "http://foo.com/bar/?stuff=yeah&moreStuff=&moreStuff=jazz&otherStuff";
        assert_eq!(
            Value::Object(get_query_params_collapsed(url, &["moreStuff"]).unwrap()),
            json!({"stuff": "yeah", "moreStuff": ["", "jazz"], "otherStuff": ""})
        );
    }
}
