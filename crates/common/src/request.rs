//! Request helpers
//!
//! Building the request URL from an endpoint and user-entered values, and
//! keeping large payloads readable when they are displayed.

use crate::ParameterDescriptor;
use serde_json::Value;
use std::collections::HashMap;
use url::form_urlencoded;

/// Default display cap for string values
pub const MAX_STRING_LENGTH: usize = 100;

/// Build the full request URL for an endpoint
///
/// One trailing `/` is dropped from `base_url` and a leading `/` is added to
/// `path` when missing. Query parameters are appended in `params` order, and
/// only those whose value is present, non-null and not the empty string. If
/// `path` already carries a query string the new pairs are joined with `&`.
///
/// # Example
/// ```rust
/// use api_explorer_common::{build_url, ParameterDescriptor};
/// use std::collections::HashMap;
///
/// let params = vec![ParameterDescriptor::new("q")];
/// let values = HashMap::from([("q".to_string(), serde_json::json!("rust lang"))]);
///
/// let url = build_url("https://api.example.com/", "search", &params, &values);
/// assert_eq!(url, "https://api.example.com/search?q=rust+lang");
/// ```
pub fn build_url(
    base_url: &str,
    path: &str,
    params: &[ParameterDescriptor],
    values: &HashMap<String, Value>,
) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let mut url = if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut appended = false;
    for param in params {
        if let Some(value) = values.get(&param.name).and_then(query_value) {
            serializer.append_pair(&param.name, &value);
            appended = true;
        }
    }

    if appended {
        let query = serializer.finish();
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&query);
    }

    url
}

/// Text form of a user-entered value, `None` when it should be left out
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Cap a string at `max_length` characters, marking the cut with `...`
pub fn truncate_string(data: &str, max_length: usize) -> String {
    if data.chars().count() > max_length {
        let mut truncated: String = data.chars().take(max_length).collect();
        truncated.push_str("...");
        truncated
    } else {
        data.to_string()
    }
}

/// Copy of `value` with every string value truncated, at any depth
///
/// Object keys are left alone; numbers, booleans and nulls pass through.
pub fn truncate_strings(value: &Value, max_length: usize) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_string(s, max_length)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| truncate_strings(item, max_length))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), truncate_strings(item, max_length)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Render an elapsed time in whole milliseconds, e.g. `"123 ms"`
pub fn format_response_time(milliseconds: f64) -> String {
    format!("{} ms", milliseconds.round() as i64)
}
