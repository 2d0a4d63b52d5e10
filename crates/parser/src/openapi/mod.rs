//! OpenAPI document import
//!
//! Flattens an OpenAPI 3 document (YAML or JSON) into what the explorer
//! needs to build requests: the candidate base URLs and one endpoint per
//! (path, method) pair with its query parameters.
//!
//! ## Parameter scopes
//!
//! Parameters declared on a path item apply to every operation under it.
//! An operation may redeclare a parameter with the same name and location,
//! in which case its definition wins. Only `in: query` parameters are kept,
//! since path, header and cookie values are not entered through the query
//! form.
//!
//! ## Usage
//! ```rust
//! use api_explorer_parser::openapi::parse_openapi;
//!
//! let parsed = parse_openapi("servers:\n  - url: https://api.example.com\npaths:\n  /users:\n    get: {}\n");
//! assert_eq!(parsed.base_urls, vec!["https://api.example.com"]);
//! assert_eq!(parsed.endpoints[0].path, "/users");
//! ```

mod converter;
mod parser;
mod types;

pub use parser::{parse_openapi, ErrorSink, OpenApiParser, TracingErrorSink};
pub use types::{OpenApiDocument, INVALID_DOCUMENT};
