//! Resource MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes a
//! registry of named, URI-addressed resources to clients.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the `ServerHandler` and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **resources**: descriptors, content producers and the registry
//!
//! # Example
//!
//! ```rust,no_run
//! use resource_mcp_server::core::{Config, McpServer, TransportService};
//! use resource_mcp_server::domains::resources::{ResourceOptions, ResourceRegistry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!
//!     let mut registry = ResourceRegistry::new();
//!     registry.add_simple_resource(
//!         "file:///readme.txt",
//!         "text/plain",
//!         "hello",
//!         ResourceOptions::new(),
//!     );
//!
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::with_registry(config, registry);
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use crate::core::{Config, Error, McpServer, Result};
