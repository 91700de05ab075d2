//! Resources domain module.
//!
//! This module handles all resource-related functionality for the MCP server.
//! Resources are named, URI-addressed content items that clients can list
//! and read.
//!
//! ## Architecture
//!
//! - `descriptor.rs` - Resource metadata plus its content producer
//! - `fetcher.rs` - The `ResourceFetcher` trait and its implementations
//! - `registry.rs` - The keyed store answering list/read requests
//! - `definitions/` - Built-in resources registered at startup
//!
//! Listing is not paginated and resource templates are not supported; the
//! templates listing is always empty.

pub mod definitions;
mod descriptor;
mod error;
mod fetcher;
mod registry;

pub use definitions::{ResourceDefinition, build_registry};
pub use descriptor::{ResourceDescriptor, ResourceInfo, ResourceOptions, uri_basename};
pub use error::{FetchError, INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE, ResourceError};
pub use fetcher::{
    FileFetcher, FnFetcher, ResourceData, ResourceFetcher, StaticFetcher, fetch_fn,
};
pub use registry::{ListResourcesResponse, ReadResourceResponse, ResourceRegistry};
