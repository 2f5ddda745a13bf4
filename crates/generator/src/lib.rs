//! Runtime client generation from discovery documents
//!
//! This crate turns a discovery document into a tree of callable methods,
//! without any per-API bindings:
//! - a discovery *service* document becomes an [`ApiDirectory`] of every
//!   preferred API it lists
//! - a single API's REST document becomes an [`ApiTree`]
//!
//! ```rust,ignore
//! use discovery_client_generator::{generate_api, CallArgs};
//! use discovery_client_common::GenerateOptions;
//!
//! let api = generate_api(GenerateOptions::new().with_api_key("...")).await?;
//! let search = api.lookup("plus.people.search").unwrap();
//! let people = search.call(&CallArgs::new().with("query", "Dave").with("maxResults", 5)).await?;
//! ```

mod directory;
mod fetcher;
mod method;
mod transport;
mod tree;
mod walker;

pub use directory::expand;
pub use fetcher::Fetcher;
pub use method::{compile, method_label, ApiMethod, Binding, BindingContext, CallArgs};
pub use transport::{HttpTransport, Transport, TransportError};
pub use tree::{ApiDirectory, ApiTree, GeneratedApi};
pub use walker::{compile_api, walk};

use discovery_client_common::{DocumentKind, GenerateError, GenerateOptions, Result};
use discovery_client_parser::DiscoveryParser;
use std::sync::Arc;
use tracing::info;

/// Generates callable APIs from the discovery source named by its options
pub struct Generator {
    options: GenerateOptions,
    fetcher: Fetcher,
}

impl Generator {
    /// Create a generator that talks HTTP through [`HttpTransport`]
    pub fn new(options: GenerateOptions) -> Result<Self> {
        let transport = HttpTransport::new().map_err(|e| GenerateError::Transport {
            source_id: "HTTP client".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::with_transport(options, Arc::new(transport)))
    }

    /// Create a generator over a custom transport
    ///
    /// The transport is used both for discovery fetches and by every
    /// generated method.
    pub fn with_transport(options: GenerateOptions, transport: Arc<dyn Transport>) -> Self {
        Self {
            options,
            fetcher: Fetcher::new(transport),
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Fetch the discovery document and compile it
    ///
    /// Nothing is returned unless every API, resource and method compiled.
    pub async fn generate(&self) -> Result<GeneratedApi> {
        let resolved = self.options.resolve();
        let source_id = resolved.source.to_string();
        let api_key = self.options.api_key.as_deref();

        let doc = self
            .fetcher
            .fetch_optional(&resolved.source)
            .await?
            .ok_or_else(|| GenerateError::NoDocument {
                source_id: source_id.clone(),
            })?;
        let parser = DiscoveryParser::from_value(doc, &source_id);

        match resolved.kind {
            DocumentKind::Directory => {
                let service = parser.into_directory()?;
                let directory = expand(&self.fetcher, api_key, &service, &source_id).await?;
                info!(source = %source_id, apis = directory.len(), "Generated API directory");
                Ok(GeneratedApi::Directory(directory))
            }
            DocumentKind::Api => {
                let api = parser.into_rest()?;
                let tree = compile_api(self.fetcher.transport(), api_key, &api).await?;
                info!(source = %source_id, methods = tree.method_count(), "Generated API");
                Ok(GeneratedApi::Api(tree))
            }
        }
    }
}

/// Generate an API surface with the default HTTP transport
pub async fn generate_api(options: GenerateOptions) -> Result<GeneratedApi> {
    Generator::new(options)?.generate().await
}
