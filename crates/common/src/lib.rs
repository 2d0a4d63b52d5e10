//! Common types and utilities for API Explorer
//!
//! This crate contains the shared data model produced by the parser crate
//! (endpoint descriptors and the parsed-document result), the error type, and
//! the small request helpers used around a request: URL building, display
//! truncation and the share-link codec.

pub mod request;
pub mod share;

pub use request::{
    build_url, format_response_time, truncate_string, truncate_strings, MAX_STRING_LENGTH,
};
pub use share::{decode_from_path, encode_to_path};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while importing documents or structuring responses
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("{0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for explorer operations
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// HTTP methods recognised as operations in an OpenAPI path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// All methods, in the order OpenAPI lists them
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ExplorerError;

    /// Case-insensitive, so `get`, `Get` and `GET` all match
    fn from_str(s: &str) -> Result<Self> {
        HttpMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExplorerError::Parse(format!("Unknown HTTP method: {}", s)))
    }
}

/// A query parameter an endpoint accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name
    pub name: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Schema, carried through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,

    /// Required flag, absent when the document does not say
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema: None,
            required: None,
        }
    }
}

/// One (path, method) pair found in an API document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub query_params: Vec<ParameterDescriptor>,
}

/// Result of importing an API document
///
/// Either `base_urls` and `endpoints` are populated, or `error` is set and
/// both lists are empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub base_urls: Vec<String>,
    pub endpoints: Vec<Endpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedDocument {
    /// The terminal failure state: no URLs, no endpoints, just the message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            base_urls: Vec::new(),
            endpoints: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
