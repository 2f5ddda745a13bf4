//! Loads discovery documents from local files or over HTTP

use crate::transport::Transport;
use discovery_client_common::{DocumentSource, GenerateError, Result};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Fetches raw JSON documents from a [`DocumentSource`]
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Transport shared with every compiled method
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Fetch and parse a document, failing when it has no body
    pub async fn fetch(&self, source: &DocumentSource) -> Result<Value> {
        self.fetch_optional(source)
            .await?
            .ok_or_else(|| GenerateError::EmptyDocument {
                source_id: source.to_string(),
            })
    }

    /// Fetch and parse a document; an empty body or JSON `null` is `None`
    pub async fn fetch_optional(&self, source: &DocumentSource) -> Result<Option<Value>> {
        let source_id = source.to_string();
        debug!(source = %source_id, "Fetching discovery document");

        let content = match source {
            DocumentSource::File(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    GenerateError::Read {
                        source_id: source_id.clone(),
                        source: e,
                    }
                })?;
                (!content.trim().is_empty()).then_some(content)
            }
            DocumentSource::Url(url) => self
                .transport
                .send(Method::GET, url, None)
                .await
                .map_err(|e| GenerateError::Transport {
                    source_id: source_id.clone(),
                    message: e.to_string(),
                })?,
        };

        let Some(content) = content else {
            return Ok(None);
        };

        let doc: Value = serde_json::from_str(&content).map_err(|e| GenerateError::Parse {
            source_id: source_id.clone(),
            source: e,
        })?;

        if doc.is_null() {
            return Ok(None);
        }
        Ok(Some(doc))
    }
}
