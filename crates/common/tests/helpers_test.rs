//! Integration tests for the request helpers and share links

use api_explorer_common::{
    build_url, decode_from_path, encode_to_path, truncate_strings, ParameterDescriptor,
    MAX_STRING_LENGTH,
};
use serde_json::{json, Value};
use std::collections::HashMap;

#[test]
fn test_build_url_for_imported_endpoint() {
    let params = vec![
        ParameterDescriptor::new("status"),
        ParameterDescriptor::new("tags"),
        ParameterDescriptor::new("limit"),
        ParameterDescriptor::new("offset"),
    ];
    let values: HashMap<String, Value> = HashMap::from([
        ("limit".to_string(), json!(20)),
        ("status".to_string(), json!("sold out")),
        ("offset".to_string(), json!("")),
        ("unknown".to_string(), json!("ignored")),
    ]);

    assert_eq!(
        build_url("https://petstore.example.com/v1/", "pets/findByStatus", &params, &values),
        "https://petstore.example.com/v1/pets/findByStatus?status=sold+out&limit=20"
    );
}

#[test]
fn test_build_url_with_empty_base() {
    let values = HashMap::from([("q".to_string(), json!(true))]);
    assert_eq!(
        build_url("", "/search", &[ParameterDescriptor::new("q")], &values),
        "/search?q=true"
    );
}

#[test]
fn test_share_link_round_trip() {
    let samples = [
        "x",
        "# Title\n\nSome *markdown* with a [link](https://example.com?a=1&b=2).\n",
        "openapi: 3.0.0\npaths:\n  /users:\n    get: {}\n",
        "日本語のテキスト\r\nwith CRLF",
    ];

    for sample in samples {
        assert_eq!(decode_from_path(&encode_to_path(sample)), sample);
    }
}

#[test]
fn test_truncate_large_payload_for_display() {
    let payload = json!({
        "id": 7,
        "body": "b".repeat(MAX_STRING_LENGTH * 3),
        "nested": { "short": "ok" }
    });

    let truncated = truncate_strings(&payload, MAX_STRING_LENGTH);
    assert_eq!(
        truncated["body"].as_str().unwrap().chars().count(),
        MAX_STRING_LENGTH + 3
    );
    assert_eq!(truncated["nested"]["short"], "ok");
    assert_eq!(truncated["id"], 7);
}
