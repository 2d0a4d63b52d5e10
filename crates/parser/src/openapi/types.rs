//! Loosely-typed view over an OpenAPI document
//!
//! Imported documents are frequently incomplete or hand-edited, so the
//! document is kept as a YAML tree and only the parts the explorer needs are
//! read: `servers[].url`, `paths` and `components.parameters`.

use api_explorer_common::{ExplorerError, Result};
use serde_yaml::{Mapping, Value};

/// Message for documents that are not a mapping at the top level
pub const INVALID_DOCUMENT: &str = "Invalid YAML";

const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// OpenAPI document root
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    root: Mapping,
}

impl OpenApiDocument {
    /// Wrap a deserialized document, applying `<<` merge keys
    ///
    /// A top-level sequence is read as a document with no servers and no
    /// paths. Null and scalars are rejected with [`INVALID_DOCUMENT`].
    pub fn from_value(mut value: Value) -> Result<Self> {
        value.apply_merge()?;
        match value {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Sequence(_) => Ok(Self {
                root: Mapping::new(),
            }),
            _ => Err(ExplorerError::Parse(INVALID_DOCUMENT.to_string())),
        }
    }

    /// Server URLs in listed order
    ///
    /// Entries without a string `url` are skipped. A `servers` value that is
    /// present but not a list is an error.
    pub fn server_urls(&self) -> Result<Vec<String>> {
        match self.root.get("servers") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(servers)) => Ok(servers
                .iter()
                .filter_map(|server| match server.get("url") {
                    Some(Value::String(url)) => Some(url.clone()),
                    _ => {
                        tracing::debug!("Skipping server entry without a url");
                        None
                    }
                })
                .collect()),
            Some(_) => Err(ExplorerError::Parse(
                "servers must be a list".to_string(),
            )),
        }
    }

    /// The `paths` mapping, if the document has one
    pub fn paths(&self) -> Option<&Mapping> {
        self.root.get("paths").and_then(Value::as_mapping)
    }

    /// Resolve a parameter list item to its definition
    ///
    /// Inline definitions are returned as-is. `$ref`s are followed into
    /// `components.parameters`; only local references are supported.
    /// e.g., "#/components/parameters/Limit" -> the Limit parameter
    pub fn resolve_parameter<'a>(&'a self, item: &'a Value) -> Option<&'a Mapping> {
        let definition = item.as_mapping()?;

        let Some(ref_path) = definition.get("$ref").and_then(Value::as_str) else {
            return Some(definition);
        };

        let resolved = ref_path
            .strip_prefix(PARAMETER_REF_PREFIX)
            .map(unescape_pointer_token)
            .and_then(|name| {
                self.root
                    .get("components")
                    .and_then(|components| components.get("parameters"))
                    .and_then(|parameters| parameters.get(name.as_str()))
            })
            .and_then(Value::as_mapping);

        if resolved.is_none() {
            tracing::debug!("Unresolved parameter reference: {}", ref_path);
        }
        resolved
    }
}

/// Undo JSON pointer escaping (`~1` -> `/`, `~0` -> `~`)
fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Text form of a mapping key, as a JavaScript object key would read
pub(crate) fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(yaml: &str) -> OpenApiDocument {
        OpenApiDocument::from_value(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_rejects_non_mapping_documents() {
        for value in [Value::Null, Value::from(42), Value::from("text")] {
            let err = OpenApiDocument::from_value(value).unwrap_err();
            assert_eq!(err.to_string(), INVALID_DOCUMENT);
        }
    }

    #[test]
    fn test_sequence_document_is_empty() {
        let doc = document("- a\n- b\n");
        assert!(doc.server_urls().unwrap().is_empty());
        assert!(doc.paths().is_none());
    }

    #[test]
    fn test_server_urls() {
        let doc = document(
            "servers:\n  - url: https://a.example.com\n  - description: no url\n  - url: https://b.example.com\n",
        );
        assert_eq!(
            doc.server_urls().unwrap(),
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert!(document("openapi: 3.0.0").server_urls().unwrap().is_empty());
        assert!(document("servers: https://a.example.com")
            .server_urls()
            .is_err());
    }

    #[test]
    fn test_resolve_parameter_ref() {
        let doc = document(
            r##"
components:
  parameters:
    Limit:
      name: limit
      in: query
    a/b:
      name: slashed
      in: query
"##,
        );

        let item: Value = serde_yaml::from_str("$ref: '#/components/parameters/Limit'").unwrap();
        let resolved = doc.resolve_parameter(&item).unwrap();
        assert_eq!(resolved.get("name").and_then(Value::as_str), Some("limit"));

        let item: Value = serde_yaml::from_str("$ref: '#/components/parameters/a~1b'").unwrap();
        let resolved = doc.resolve_parameter(&item).unwrap();
        assert_eq!(resolved.get("name").and_then(Value::as_str), Some("slashed"));

        let missing: Value = serde_yaml::from_str("$ref: '#/components/parameters/Nope'").unwrap();
        assert!(doc.resolve_parameter(&missing).is_none());

        let external: Value = serde_yaml::from_str("$ref: 'common.yaml#/Limit'").unwrap();
        assert!(doc.resolve_parameter(&external).is_none());
    }

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(&Value::from("/users")), Some("/users".to_string()));
        assert_eq!(key_to_string(&Value::from(200)), Some("200".to_string()));
        assert_eq!(key_to_string(&Value::Null), None);
    }
}
