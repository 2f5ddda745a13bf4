//! Generation options and discovery source resolution
//!
//! Options can be built in code, or loaded from a YAML/JSON file whose keys
//! use the camelCase names of the discovery options (`discoveryServiceUrl`,
//! `discoveryRestFile`, `apiKey`, ...).

use crate::{GenerateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Public discovery service used when no source option is supplied
pub const DEFAULT_DISCOVERY_SERVICE_URL: &str = "https://www.googleapis.com/discovery/v1/apis";

/// Options controlling a single generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    /// File containing a discovery service (directory) document
    #[serde(default)]
    pub discovery_service_file: Option<PathBuf>,

    /// URL of a discovery service (directory) document
    #[serde(default)]
    pub discovery_service_url: Option<String>,

    /// File containing a single API's discovery document
    #[serde(default)]
    pub discovery_rest_file: Option<PathBuf>,

    /// URL of a single API's discovery document
    #[serde(default)]
    pub discovery_rest_url: Option<String>,

    /// API key appended to every generated call as `key=<apiKey>`
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Where a discovery document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Url(String),
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::File(path) => write!(f, "{}", path.display()),
            DocumentSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Whether a document lists many APIs or describes one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A discovery service document with an `items` list
    Directory,
    /// A single API's REST description
    Api,
}

/// The source and kind chosen for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub source: DocumentSource,
    pub kind: DocumentKind,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GenerateError::Read {
            source_id: path.display().to_string(),
            source: e,
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            GenerateError::Options(format!(
                "Failed to parse options file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn with_service_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.discovery_service_file = Some(path.into());
        self
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_service_url = Some(url.into());
        self
    }

    pub fn with_rest_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.discovery_rest_file = Some(path.into());
        self
    }

    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_rest_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: GenerateOptions) -> Self {
        Self {
            discovery_service_file: other.discovery_service_file.or(self.discovery_service_file),
            discovery_service_url: other.discovery_service_url.or(self.discovery_service_url),
            discovery_rest_file: other.discovery_rest_file.or(self.discovery_rest_file),
            discovery_rest_url: other.discovery_rest_url.or(self.discovery_rest_url),
            api_key: other.api_key.or(self.api_key),
        }
    }

    /// Pick the document to load and how to interpret it
    ///
    /// Files win over URLs, and a single-API option wins over a service
    /// option of the same medium. With no source option at all the public
    /// discovery service is used.
    pub fn resolve(&self) -> ResolvedSource {
        // The kind follows the chosen source: a rest file is compiled as a
        // single API even when a service URL is also set.
        if let Some(path) = &self.discovery_rest_file {
            return ResolvedSource {
                source: DocumentSource::File(path.clone()),
                kind: DocumentKind::Api,
            };
        }
        if let Some(path) = &self.discovery_service_file {
            return ResolvedSource {
                source: DocumentSource::File(path.clone()),
                kind: DocumentKind::Directory,
            };
        }
        if let Some(url) = &self.discovery_rest_url {
            return ResolvedSource {
                source: DocumentSource::Url(url.clone()),
                kind: DocumentKind::Api,
            };
        }

        let url = self
            .discovery_service_url
            .clone()
            .unwrap_or_else(|| DEFAULT_DISCOVERY_SERVICE_URL.to_string());
        ResolvedSource {
            source: DocumentSource::Url(url),
            kind: DocumentKind::Directory,
        }
    }
}
