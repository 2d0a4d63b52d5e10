//! Converts an OpenAPI document into the explorer's endpoint list

use super::types::{key_to_string, OpenApiDocument};
use api_explorer_common::{Endpoint, HttpMethod, ParameterDescriptor, ParsedDocument, Result};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

const QUERY_LOCATION: &str = "query";

/// Parameters are identified by name and location
type ParameterKey = (String, String);

/// Convert an OpenAPI document to a ParsedDocument
pub fn convert_openapi_to_parsed_document(doc: &OpenApiDocument) -> Result<ParsedDocument> {
    let mut base_urls = doc.server_urls()?;

    // Callers always get at least one base URL to combine with a path
    if base_urls.is_empty() {
        base_urls.push(String::new());
    }

    let endpoints = extract_endpoints(doc);

    Ok(ParsedDocument {
        base_urls,
        endpoints,
        error: None,
    })
}

/// One endpoint per HTTP method key, in document order
fn extract_endpoints(doc: &OpenApiDocument) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();

    let Some(paths) = doc.paths() else {
        return endpoints;
    };

    for (path, path_item) in paths {
        let (Some(path), Some(path_item)) = (key_to_string(path), path_item.as_mapping()) else {
            continue;
        };

        let shared_parameters = path_item.get("parameters");

        for (key, operation) in path_item {
            // Skips siblings such as `parameters`, `summary` or `servers`
            let Some(method) = key.as_str().and_then(|k| k.parse::<HttpMethod>().ok()) else {
                continue;
            };

            let query_params =
                merge_query_parameters(doc, shared_parameters, operation.get("parameters"));

            endpoints.push(Endpoint {
                path: path.clone(),
                method,
                query_params,
            });
        }
    }

    endpoints
}

/// Merge path-level and operation-level parameters, keeping query parameters
///
/// Entries are keyed by `(name, in)`. An operation-level definition replaces
/// a path-level one with the same key but keeps its position.
fn merge_query_parameters(
    doc: &OpenApiDocument,
    path_level: Option<&Value>,
    operation_level: Option<&Value>,
) -> Vec<ParameterDescriptor> {
    let mut merged: IndexMap<ParameterKey, &Mapping> = IndexMap::new();

    for scope in [path_level, operation_level].into_iter().flatten() {
        let Some(items) = scope.as_sequence() else {
            tracing::debug!("Ignoring parameters that are not a list");
            continue;
        };

        for item in items {
            let Some(definition) = doc.resolve_parameter(item) else {
                continue;
            };
            let Some(name) = definition.get("name").and_then(Value::as_str) else {
                tracing::debug!("Skipping parameter without a name");
                continue;
            };
            let location = definition
                .get("in")
                .and_then(Value::as_str)
                .unwrap_or_default();

            merged.insert((name.to_string(), location.to_string()), definition);
        }
    }

    merged
        .into_iter()
        .filter(|((_, location), _)| location == QUERY_LOCATION)
        .map(|((name, _), definition)| convert_parameter(name, definition))
        .collect()
}

/// Project a parameter definition, leaving absent fields absent
fn convert_parameter(name: String, definition: &Mapping) -> ParameterDescriptor {
    ParameterDescriptor {
        name,
        description: definition
            .get("description")
            .and_then(Value::as_str)
            .map(String::from),
        schema: definition.get("schema").map(yaml_to_json),
        required: definition.get("required").and_then(Value::as_bool),
    }
}

/// Carry a YAML value over to JSON
///
/// Mapping keys become strings the way a JavaScript object key would read
/// (`~` becomes `"null"`). Tags are dropped and non-finite floats become
/// `null`.
fn yaml_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(u) = n.as_u64() {
                u.into()
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => items.iter().map(yaml_to_json).collect(),
        Value::Mapping(mapping) => mapping
            .iter()
            .map(|(key, value)| (json_key(key), yaml_to_json(value)))
            .collect::<serde_json::Map<_, _>>()
            .into(),
        Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn json_key(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => json_key(&tagged.value),
        other => key_to_string(other).unwrap_or_else(|| {
            serde_yaml::to_string(other)
                .map(|text| text.trim_end().to_string())
                .unwrap_or_default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(yaml: &str) -> ParsedDocument {
        let doc = OpenApiDocument::from_value(serde_yaml::from_str(yaml).unwrap()).unwrap();
        convert_openapi_to_parsed_document(&doc).unwrap()
    }

    #[test]
    fn test_operation_parameter_replaces_path_parameter_in_place() {
        let parsed = convert(
            r#"
paths:
  /items:
    parameters:
      - name: page
        in: query
        description: path-level page
      - name: size
        in: query
    get:
      parameters:
        - name: sort
          in: query
        - name: page
          in: query
          description: operation-level page
          required: true
"#,
        );

        let names: Vec<&str> = parsed.endpoints[0]
            .query_params
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["page", "size", "sort"]);

        let page = &parsed.endpoints[0].query_params[0];
        assert_eq!(page.description.as_deref(), Some("operation-level page"));
        assert_eq!(page.required, Some(true));
    }

    #[test]
    fn test_same_name_different_location_are_distinct() {
        let parsed = convert(
            r#"
paths:
  /items/{id}:
    parameters:
      - name: id
        in: path
        required: true
    get:
      parameters:
        - name: id
          in: query
        - name: X-Trace
          in: header
"#,
        );

        let params = &parsed.endpoints[0].query_params;
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "id");
        assert_eq!(params[0].required, None);
    }

    #[test]
    fn test_schema_is_carried_as_json() {
        let parsed = convert(
            r#"
paths:
  /search:
    get:
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            maximum: 100
"#,
        );

        assert_eq!(
            parsed.endpoints[0].query_params[0].schema,
            Some(json!({ "type": "integer", "maximum": 100 }))
        );
    }

    #[test]
    fn test_schema_with_non_string_keys_is_kept() {
        let parsed = convert(
            r#"
paths:
  /search:
    get:
      parameters:
        - name: filter
          in: query
          schema:
            type: object
            example: {~: 1, 2: two, true: yes}
"#,
        );

        assert!(!parsed.is_error());
        assert_eq!(
            parsed.endpoints[0].query_params[0].schema,
            Some(json!({
                "type": "object",
                "example": { "null": 1, "2": "two", "true": "yes" }
            }))
        );
    }

    #[test]
    fn test_non_mapping_path_items_are_skipped() {
        let parsed = convert(
            r#"
paths:
  /empty:
  /text: hello
  /ok:
    get: {}
"#,
        );

        assert_eq!(parsed.endpoints.len(), 1);
        assert_eq!(parsed.endpoints[0].path, "/ok");
    }
}
