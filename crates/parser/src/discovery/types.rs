//! Discovery document type definitions
//!
//! Only the parts of the format needed to build callable clients are
//! modelled; everything else in a document is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discovery service document: a catalog of APIs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDirectory {
    /// Document kind (e.g., "discovery#directoryList")
    #[serde(default)]
    pub kind: Option<String>,

    /// Discovery version (e.g., "v1")
    #[serde(rename = "discoveryVersion")]
    #[serde(default)]
    pub discovery_version: Option<String>,

    /// Listed APIs; absence is reported by the directory expander, not here
    #[serde(default)]
    pub items: Option<Vec<DirectoryEntry>>,
}

/// One API listed in a discovery service document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Directory ID (e.g., "plus:v1")
    #[serde(default)]
    pub id: Option<String>,

    /// API name (e.g., "plus"), the key in a compiled directory
    #[serde(default)]
    pub name: String,

    /// API version (e.g., "v1")
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Only preferred versions are expanded
    #[serde(default)]
    pub preferred: Option<bool>,

    /// Location of this API's own discovery document
    #[serde(rename = "discoveryRestUrl")]
    #[serde(default)]
    pub discovery_rest_url: Option<String>,
}

impl DirectoryEntry {
    /// The URL to expand, if this entry is preferred and has one
    pub fn expandable_url(&self) -> Option<&str> {
        match (self.preferred, self.discovery_rest_url.as_deref()) {
            (Some(true), Some(url)) if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

/// A single API's discovery (REST) document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestDescription {
    /// API name (e.g., "storage")
    #[serde(default)]
    pub name: Option<String>,

    /// API version (e.g., "v1")
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Base URL all method paths are relative to
    #[serde(rename = "baseUrl")]
    #[serde(default)]
    pub base_url: Option<String>,

    /// Root URL (e.g., "<https://storage.googleapis.com/>")
    #[serde(rename = "rootUrl")]
    #[serde(default)]
    pub root_url: Option<String>,

    /// Service path (e.g., "storage/v1/")
    #[serde(rename = "servicePath")]
    #[serde(default)]
    pub service_path: Option<String>,

    /// Root-level methods and resources
    #[serde(flatten)]
    pub root: ResourceDescriptor,
}

impl RestDescription {
    /// Base URL for every method of this API
    ///
    /// Uses `baseUrl` when declared, otherwise `rootUrl` joined with
    /// `servicePath`.
    pub fn resolved_base_url(&self) -> Option<String> {
        if let Some(base) = &self.base_url {
            return Some(base.clone());
        }
        match (&self.root_url, &self.service_path) {
            (Some(root), Some(service_path)) => Some(format!("{}{}", root, service_path)),
            (Some(root), None) => Some(root.clone()),
            _ => None,
        }
    }

    /// Name used in diagnostics
    pub fn display_name(&self) -> String {
        match (&self.name, &self.version) {
            (Some(name), Some(version)) => format!("{}:{}", name, version),
            (Some(name), None) => name.clone(),
            _ => "<unnamed>".to_string(),
        }
    }
}

/// Resource: a named group of methods and nested resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Methods for this resource
    #[serde(default)]
    pub methods: BTreeMap<String, MethodDescriptor>,

    /// Nested resources
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDescriptor>,
}

impl ResourceDescriptor {
    /// Number of methods in this resource and every nested resource
    pub fn method_count(&self) -> usize {
        self.methods.len()
            + self
                .resources
                .values()
                .map(ResourceDescriptor::method_count)
                .sum::<usize>()
    }
}

/// Method (API operation)
///
/// `httpMethod` and `path` are checked when the method is compiled, so a
/// broken method fails its own subtree instead of the whole parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method ID (e.g., "storage.buckets.insert")
    #[serde(default)]
    pub id: Option<String>,

    /// HTTP path template with `{name}` placeholders
    #[serde(default)]
    pub path: Option<String>,

    /// HTTP method (GET, POST, PUT, DELETE, PATCH)
    #[serde(rename = "httpMethod")]
    #[serde(default)]
    pub http_method: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}
