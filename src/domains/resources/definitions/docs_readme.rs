//! Documentation readme resource definition.

use super::ResourceDefinition;
use crate::core::Config;
use crate::domains::resources::{ResourceOptions, ResourceRegistry};

/// Server documentation resource (static Markdown).
pub struct DocsReadmeResource;

impl ResourceDefinition for DocsReadmeResource {
    const URI: &'static str = "mcp://server/docs/readme";
    const TITLE: &'static str = "Server Documentation";
    const DESCRIPTION: &'static str = "Documentation for using this MCP server";
    const MIME_TYPE: &'static str = "text/markdown";

    fn register(registry: &mut ResourceRegistry, _config: &Config) {
        registry.add_simple_resource(
            Self::URI,
            Self::MIME_TYPE,
            DOCUMENTATION,
            ResourceOptions::new()
                .title(Self::TITLE)
                .description(Self::DESCRIPTION),
        );
    }
}

const DOCUMENTATION: &str = r#"# Resource Server

This server exposes read-only, URI-addressed resources over MCP.

## Methods

- `resources/list`: every registered resource with its metadata
- `resources/read`: the current content of one resource
- `resources/templates/list`: always empty, templates are not supported

Listing is not paginated. A `cursor` parameter is accepted and ignored.

## Built-in Resources

- `mcp://server/info`: Server information
- `mcp://server/docs/readme`: This documentation

Files placed in the directory named by `MCP_RESOURCES_BASE_PATH` are
exposed as `file://` resources.
"#;
