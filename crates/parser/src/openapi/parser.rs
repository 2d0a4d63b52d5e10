//! OpenAPI document parser

use super::types::{OpenApiDocument, INVALID_DOCUMENT};
use api_explorer_common::{ExplorerError, ParsedDocument, Result};
use std::fs;
use std::path::Path;

/// Receives the message of every failed import
///
/// Parsing never fails to the caller; failures are turned into a
/// [`ParsedDocument`] with `error` set and reported here.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Default sink, emits a `tracing` error event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, message: &str) {
        tracing::error!("Failed to parse OpenAPI: {}", message);
    }
}

/// OpenAPI specification parser
///
/// Reads OpenAPI documents in YAML or JSON (JSON is a YAML subset) and
/// flattens them into base URLs and endpoints with their query parameters.
pub struct OpenApiParser {
    /// Raw document text
    source: String,

    /// Where failures are reported
    error_sink: Box<dyn ErrorSink>,
}

impl OpenApiParser {
    /// Load an OpenAPI document from file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parsed = OpenApiParser::from_file("petstore.yaml")?.parse();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ExplorerError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(Self::from_yaml(content))
    }

    /// Parser over a YAML or JSON document
    pub fn from_yaml(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            error_sink: Box::new(TracingErrorSink),
        }
    }

    /// Report failures somewhere other than the tracing subscriber
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.error_sink = Box::new(sink);
        self
    }

    /// Parse the document into base URLs and endpoints
    ///
    /// Never fails: on error the result has no URLs, no endpoints and the
    /// error message, and the message goes to the error sink.
    pub fn parse(&self) -> ParsedDocument {
        match self.try_parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                let message = e.to_string();
                self.error_sink.report(&message);
                ParsedDocument::failed(message)
            }
        }
    }

    fn try_parse(&self) -> Result<ParsedDocument> {
        if self.source.trim().is_empty() {
            return Err(ExplorerError::Parse(INVALID_DOCUMENT.to_string()));
        }

        let value: serde_yaml::Value = serde_yaml::from_str(&self.source)?;
        let doc = OpenApiDocument::from_value(value)?;

        super::converter::convert_openapi_to_parsed_document(&doc)
    }
}

/// Parse an OpenAPI document with the default error sink
pub fn parse_openapi(source: &str) -> ParsedDocument {
    OpenApiParser::from_yaml(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_is_reported_once() {
        let mut sink = MockErrorSink::new();
        sink.expect_report()
            .withf(|message| message == INVALID_DOCUMENT)
            .times(1)
            .return_const(());

        let parsed = OpenApiParser::from_yaml("42").with_error_sink(sink).parse();
        assert_eq!(parsed.error.as_deref(), Some(INVALID_DOCUMENT));
    }

    #[test]
    fn test_success_is_not_reported() {
        let mut sink = MockErrorSink::new();
        sink.expect_report().never();

        let parsed = OpenApiParser::from_yaml("paths: {}")
            .with_error_sink(sink)
            .parse();
        assert!(!parsed.is_error());
        assert_eq!(parsed.base_urls, vec![String::new()]);
    }

    #[test]
    fn test_syntax_error_keeps_underlying_message() {
        let parsed = parse_openapi("paths: [unclosed");
        let error = parsed.error.unwrap();
        assert!(!error.is_empty());
        assert_ne!(error, INVALID_DOCUMENT);
    }
}
