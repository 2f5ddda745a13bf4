//! Discovery document parser

use super::types::{RestDescription, ServiceDirectory};
use discovery_client_common::{GenerateError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Discovery document parser
///
/// Holds one raw JSON document together with the identifier of where it
/// came from, and converts it into the typed model on demand.
#[derive(Debug, Clone)]
pub struct DiscoveryParser {
    /// Raw document
    doc: Value,

    /// File path or URL the document was read from
    source_id: String,
}

impl DiscoveryParser {
    /// Load a discovery document from a file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = DiscoveryParser::from_file("storage-v1.json")?;
    /// let api = parser.into_rest()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source_id = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|e| GenerateError::Read {
            source_id: source_id.clone(),
            source: e,
        })?;

        Self::from_json(&content, &source_id)
    }

    /// Parse a discovery document from a JSON string
    pub fn from_json(json: &str, source_id: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json).map_err(|e| GenerateError::Parse {
            source_id: source_id.to_string(),
            source: e,
        })?;

        Ok(Self::from_value(doc, source_id))
    }

    /// Wrap an already parsed JSON document
    pub fn from_value(doc: Value, source_id: &str) -> Self {
        Self {
            doc,
            source_id: source_id.to_string(),
        }
    }

    /// Interpret the document as a discovery service document
    pub fn into_directory(self) -> Result<ServiceDirectory> {
        self.convert()
    }

    /// Interpret the document as a single API's discovery document
    pub fn into_rest(self) -> Result<RestDescription> {
        self.convert()
    }

    /// Get reference to the underlying document
    pub fn doc(&self) -> &Value {
        &self.doc
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    fn convert<T: DeserializeOwned>(self) -> Result<T> {
        let source_id = self.source_id;
        serde_json::from_value(self.doc).map_err(|e| GenerateError::Parse { source_id, source: e })
    }
}
