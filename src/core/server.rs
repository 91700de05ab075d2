//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! resources capability by delegating to the resource registry.
//!
//! The registry is built once before serving starts and then shared,
//! read-only, by every connection the transport accepts.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::resources::{ResourceError, ResourceRegistry, build_registry};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. Cloning is
/// cheap; clones share the same registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry answering resource requests.
    registry: Arc<ResourceRegistry>,
}

impl McpServer {
    /// Create a new MCP server, registering the resources named by `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let registry = build_registry(&config)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server around an already populated registry.
    pub fn with_registry(config: Config, registry: ResourceRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the resource registry.
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Instructions sent to clients on initialization.
    pub fn instructions(&self) -> String {
        format!(
            "{} exposes {} read-only resources. Use resources/list to discover them \
             and resources/read to fetch their content. Listing is not paginated.",
            self.name(),
            self.registry.len()
        )
    }

    /// All resources in the SDK's representation.
    pub fn resources(&self) -> Vec<Resource> {
        self.registry
            .descriptors()
            .map(|d| d.to_resource())
            .collect()
    }

    /// Read a resource into the SDK's result type.
    pub async fn read_contents(
        &self,
        uri: &str,
    ) -> std::result::Result<ReadResourceResult, ResourceError> {
        let response = self.registry.read_resource(uri).await?;
        Ok(ReadResourceResult {
            contents: vec![response.into_contents()],
        })
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions()),
            capabilities: ServerCapabilities::builder().enable_resources().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, request, _context))]
    async fn list_resources(
        &self,
        request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        if let Some(cursor) = request.and_then(|r| r.cursor) {
            info!("Pagination is not supported, ignoring cursor {:?}", cursor);
        }
        Ok(ListResourcesResult {
            resources: self.resources(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _request, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        Ok(ListResourceTemplatesResult {
            resource_templates: self.registry.list_resource_templates().await,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.read_contents(&request.uri).await.map_err(McpError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::{FetchError, ResourceOptions, fetch_fn};

    fn server() -> McpServer {
        let mut registry = ResourceRegistry::new();
        registry.add_simple_resource(
            "file:///readme.txt",
            "text/plain",
            "hello",
            ResourceOptions::new(),
        );
        registry.add_resource(
            "mcp://remote/down",
            "application/json",
            fetch_fn(|| async { Err(FetchError::unavailable("service down")) }),
            ResourceOptions::new(),
        );
        McpServer::with_registry(Config::default(), registry)
    }

    #[test]
    fn test_new_registers_builtin_resources() {
        let server = McpServer::new(Config::default()).unwrap();
        assert_eq!(server.registry().len(), 2);
        assert_eq!(server.name(), "resource-server");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.resources.base_path = Some("/definitely/not/here".into());
        assert!(McpServer::new(config).is_err());
    }

    #[test]
    fn test_get_info_enables_only_resources() {
        let info = server().get_info();
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.tools.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert!(info.instructions.unwrap().contains("2 read-only resources"));
    }

    #[test]
    fn test_resources() {
        let resources = server().resources();
        assert_eq!(resources.len(), 2);
        let readme = resources
            .iter()
            .find(|r| r.raw.uri == "file:///readme.txt")
            .unwrap();
        assert_eq!(readme.raw.description.as_deref(), Some("readme.txt resource"));
    }

    #[tokio::test]
    async fn test_read_contents_text() {
        let result = server().read_contents("file:///readme.txt").await.unwrap();
        assert_eq!(result.contents.len(), 1);
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                text, mime_type, ..
            } => {
                assert_eq!(text, "hello");
                assert_eq!(mime_type.as_deref(), Some("text/plain"));
            }
            other => panic!("Expected text contents, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_contents_errors_map_to_protocol_codes() {
        let server = server();

        let missing = server.read_contents("nonexistent://x").await.unwrap_err();
        assert_eq!(McpError::from(missing).code.0, ErrorCode::INVALID_PARAMS.0);

        let failed = server.read_contents("mcp://remote/down").await.unwrap_err();
        let err = McpError::from(failed);
        assert_eq!(err.code.0, ErrorCode::INTERNAL_ERROR.0);
        assert!(err.message.contains("mcp://remote/down"));
    }
}
