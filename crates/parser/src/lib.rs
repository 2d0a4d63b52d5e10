//! Document parsing for API Explorer
//!
//! This crate turns the two kinds of external documents the explorer deals
//! with into structured data:
//!
//! - **OpenAPI documents** are flattened into base URLs and endpoints, each
//!   with its merged list of query parameters ([`openapi`]).
//! - **Response bodies** are read as JSON, or as XML flattened into a
//!   JSON-like shape, falling back to the raw text ([`structure_response`]).
//!
//! Both are pure and synchronous. Neither returns an error to the caller:
//! a failed import is reported inside the [`ParsedDocument`], and a body
//! that cannot be structured comes back as text.
//!
//! [`ParsedDocument`]: api_explorer_common::ParsedDocument

pub mod openapi;
mod response;
pub mod xml;

pub use openapi::{parse_openapi, ErrorSink, OpenApiParser, TracingErrorSink};
pub use response::{structure_response, ResponseBody};
pub use xml::{parse_xml, XmlDocument, XmlElement, XmlEntry, XmlError, XmlValue};
