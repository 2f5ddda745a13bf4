//! Common types and utilities for the discovery client generator
//!
//! This crate contains the error types, the generation options and the
//! document-source resolution shared by the parser, generator, and CLI
//! components.

mod options;

pub use options::{
    DocumentKind, DocumentSource, GenerateOptions, ResolvedSource,
    DEFAULT_DISCOVERY_SERVICE_URL,
};

use thiserror::Error;

/// Errors that can occur while generating an API surface from discovery documents
///
/// Any of these aborts the whole generation; no partially compiled API is
/// ever handed back alongside one.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Failed to read {source_id}: {source}")]
    Read {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from {source_id}: {source}")]
    Parse {
        source_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request to {source_id} failed: {message}")]
    Transport { source_id: String, message: String },

    #[error("Empty document returned from {source_id}")]
    EmptyDocument { source_id: String },

    #[error("Nothing returned from: {source_id}")]
    NoDocument { source_id: String },

    #[error("No items returned from: {source_id}")]
    MissingItems { source_id: String },

    #[error("Malformed method '{method}': {reason}")]
    MalformedMethod { method: String, reason: String },

    #[error("Invalid options: {0}")]
    Options(String),
}

/// Errors reported by a single invocation of a generated method
///
/// These never affect generation or any other generated method.
#[derive(Error, Debug)]
pub enum CallError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_source() {
        let err = GenerateError::MissingItems {
            source_id: "https://example.com/apis".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No items returned from: https://example.com/apis"
        );

        let err = GenerateError::MalformedMethod {
            method: "list".to_string(),
            reason: "missing httpMethod".to_string(),
        };
        assert!(err.to_string().contains("'list'"));
    }

    #[test]
    fn test_call_error_display() {
        let err = CallError::Transport {
            url: "https://api.x/v1/items?".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://api.x/v1/items? failed: connection refused"
        );
    }
}
