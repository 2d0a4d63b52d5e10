//! Response body structuring
//!
//! JSON is tried first; bodies that look like XML are flattened; anything
//! else is handed back as the raw text.

use crate::xml::{parse_xml, XmlDocument};
use serde_json::Value;

/// A response body in the most structured form it could be read as
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON, unmodified
    Json(Value),

    /// Flattened XML document
    Xml(XmlDocument),

    /// Neither JSON nor well-formed XML
    Text(String),
}

impl ResponseBody {
    /// JSON rendering of the body; raw text becomes a JSON string
    pub fn to_json(&self) -> Value {
        match self {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Xml(document) => document.to_json(),
            ResponseBody::Text(text) => Value::String(text.clone()),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ResponseBody::Text(_))
    }
}

/// Structure a raw response body
///
/// Never fails: text that is neither JSON nor well-formed XML is returned
/// unchanged as [`ResponseBody::Text`].
pub fn structure_response(text: &str) -> ResponseBody {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return ResponseBody::Json(value);
    }

    if text.trim_start().starts_with('<') {
        match parse_xml(text) {
            Ok(document) => return ResponseBody::Xml(document),
            Err(e) => tracing::debug!("Response looks like XML but did not parse: {}", e),
        }
    }

    ResponseBody::Text(text.to_string())
}
