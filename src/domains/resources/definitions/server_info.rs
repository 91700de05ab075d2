//! Server info resource definition.

use chrono::Utc;

use super::ResourceDefinition;
use crate::core::Config;
use crate::domains::resources::{
    FetchError, ResourceData, ResourceOptions, ResourceRegistry, fetch_fn,
};

/// Server information resource (dynamic JSON).
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "mcp://server/info";
    const TITLE: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Information about this MCP server";
    const MIME_TYPE: &'static str = "application/json";

    fn register(registry: &mut ResourceRegistry, config: &Config) {
        let name = config.server.name.clone();
        let version = config.server.version.clone();
        let base_path = config
            .resources
            .base_path
            .as_ref()
            .map(|p| p.display().to_string());
        let started_at = Utc::now().to_rfc3339();

        let fetcher = fetch_fn(move || {
            let info = serde_json::json!({
                "server": name,
                "version": version,
                "base_path": base_path,
                "started_at": started_at,
                "generated_at": Utc::now().to_rfc3339(),
            });
            let rendered = serde_json::to_string_pretty(&info)
                .map(ResourceData::Text)
                .map_err(FetchError::from);
            async move { rendered }
        });

        registry.add_resource(
            Self::URI,
            Self::MIME_TYPE,
            fetcher,
            ResourceOptions::new()
                .title(Self::TITLE)
                .description(Self::DESCRIPTION),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_metadata() {
        assert_eq!(ServerInfoResource::URI, "mcp://server/info");
        assert_eq!(ServerInfoResource::MIME_TYPE, "application/json");
    }

    #[tokio::test]
    async fn test_server_info_read() {
        let mut config = Config::default();
        config.server.name = "info-test".to_string();

        let mut registry = ResourceRegistry::new();
        ServerInfoResource::register(&mut registry, &config);

        let response = registry.read_resource(ServerInfoResource::URI).await.unwrap();
        assert_eq!(response.mime_type, "application/json");

        let info: serde_json::Value =
            serde_json::from_str(response.text.as_text().unwrap()).unwrap();
        assert_eq!(info["server"], "info-test");
        assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
        assert!(info["base_path"].is_null());
    }
}
