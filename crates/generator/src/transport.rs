//! HTTP transport used for discovery fetches and generated method calls

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A failed HTTP exchange (connection, TLS, timeout, body read)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Sends one HTTP request and hands back the raw response body
///
/// `Ok(None)` means the exchange succeeded but the body was empty. The
/// status code is not interpreted; error payloads are returned like any
/// other body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<Option<String>, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a 30 second request timeout
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("discovery-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, custom TLS, timeouts)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<Option<String>, TransportError> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        debug!(%method, url, status = %response.status(), "HTTP response");

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }
}
