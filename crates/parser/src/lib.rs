//! Discovery document parsing
//!
//! This crate turns raw discovery JSON (service directories and single-API
//! REST descriptions) into a typed model that the generator walks.

pub mod discovery;

pub use discovery::{
    DirectoryEntry, DiscoveryParser, MethodDescriptor, ResourceDescriptor, RestDescription,
    ServiceDirectory,
};
