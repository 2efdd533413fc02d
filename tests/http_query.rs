use serde_json::{json, Value};
use utilbox::http::{build_query_string, get_query_params, get_query_params_collapsed, parse_headers};

#[test]
fn built_query_parses_back_to_the_same_values() {
    let params = json!({
        "q": "rust & serde",
        "tag": ["a b", "c/d"],
        "page": 2,
        "exact": true,
    });
    let Value::Object(params) = params else { unreachable!() };

    let query = build_query_string(&params).unwrap();
    let url = format!("https://example.com/search?{}#results", query);

    let parsed = get_query_params_collapsed(&url, &["tag"]).unwrap();
    assert_eq!(
        Value::Object(parsed),
        json!({"q": "rust & serde", "tag": ["a b", "c/d"], "page": "2", "exact": "true"})
    );

    let lists = get_query_params(&url, &["q"]).unwrap();
    assert_eq!(lists["q"], json!("rust & serde"));
    assert_eq!(lists["page"], json!(["2"]));
}

#[test]
fn header_block_from_a_response() {
    let raw = "HTTP/1.0 404 Not Found\r\nCONTENT-LENGTH: 0\r\nx-request-id: abc\r\nX-Request-Id: def\r\n";
    let headers = parse_headers(raw).unwrap();

    assert_eq!(headers["Response Code"], json!(404));
    assert_eq!(headers["Response Status"], json!("Not Found"));
    assert_eq!(headers["Content-Length"], json!("0"));
    assert_eq!(headers["X-Request-Id"], json!(["abc", "def"]));
}
