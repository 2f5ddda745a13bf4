//! Discovery document model and parser
//!
//! ## Discovery Document Format
//!
//! A discovery *service* document lists APIs:
//! `{ "items": [ { "name", "preferred", "discoveryRestUrl", ... } ] }`.
//!
//! Each API publishes its own *REST* document describing a base URL and a
//! tree of resources and methods:
//! `{ "baseUrl", "methods": {...}, "resources": { "name": { "methods", "resources" } } }`.
//!
//! ## Discovery Sources
//!
//! - **List all APIs**: `GET https://www.googleapis.com/discovery/v1/apis`
//! - **Get specific API**: `GET https://{service}.googleapis.com/$discovery/rest?version={version}`
//!
//! ## Usage
//! ```rust,ignore
//! use discovery_client_parser::discovery::DiscoveryParser;
//!
//! let api = DiscoveryParser::from_file("storage-v1.json")?.into_rest()?;
//! println!("{} methods", api.root.method_count());
//! ```

mod parser;
mod types;

pub use parser::DiscoveryParser;
pub use types::*;
