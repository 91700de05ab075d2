//! Resource registry.
//!
//! The registry owns every resource the server exposes, keyed by URI and
//! listed in registration order. It is populated during startup and then
//! shared read-only with the request handlers; registration takes
//! `&mut self` and there is no internal locking.

use futures::FutureExt;
use rmcp::model::{ResourceContents, ResourceTemplate};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::descriptor::{ResourceDescriptor, ResourceInfo, ResourceOptions};
use super::error::{FetchError, ResourceError};
use super::fetcher::{ResourceData, ResourceFetcher, StaticFetcher};

/// Response to a listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResourcesResponse {
    pub resources: Vec<ResourceInfo>,
}

/// Response to a read request.
///
/// The content is always carried in `text`, whether it is textual or binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResourceResponse {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: ResourceData,
}

impl ReadResourceResponse {
    /// Convert into the SDK's content type; binary content is base64 encoded.
    pub fn into_contents(self) -> ResourceContents {
        match self.text {
            ResourceData::Text(text) => ResourceContents::TextResourceContents {
                uri: self.uri,
                mime_type: Some(self.mime_type),
                text,
                meta: None,
            },
            ResourceData::Binary(data) => ResourceContents::BlobResourceContents {
                uri: self.uri,
                mime_type: Some(self.mime_type),
                blob: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, data),
                meta: None,
            },
        }
    }
}

/// Keyed store of resource descriptors.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    /// Descriptors in registration order.
    resources: Vec<ResourceDescriptor>,

    /// Position of each URI in `resources`.
    index: HashMap<String, usize>,

    /// Parameterized resources. Declared for the templates listing, never
    /// populated or resolved.
    templates: HashMap<String, ResourceTemplate>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource whose content is the literal `data`.
    ///
    /// Re-registering a URI replaces the previous descriptor.
    pub fn add_simple_resource(
        &mut self,
        uri: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<ResourceData>,
        options: ResourceOptions,
    ) {
        self.add_resource(uri, media_type, StaticFetcher::new(data), options);
    }

    /// Register a resource backed by an arbitrary producer.
    pub fn add_resource(
        &mut self,
        uri: impl Into<String>,
        media_type: impl Into<String>,
        fetcher: impl ResourceFetcher + 'static,
        options: ResourceOptions,
    ) {
        let descriptor = ResourceDescriptor::new(uri, media_type, Arc::new(fetcher), options);
        self.register(descriptor);
    }

    /// Insert a prebuilt descriptor.
    ///
    /// A descriptor with an already registered URI replaces the old one in
    /// place, keeping its listing position.
    pub fn register(&mut self, descriptor: ResourceDescriptor) {
        info!("Registering resource: {}", descriptor.uri());
        match self.index.get(descriptor.uri()) {
            Some(&pos) => {
                debug!("Replaced existing resource: {}", descriptor.uri());
                self.resources[pos] = descriptor;
            }
            None => {
                self.index
                    .insert(descriptor.uri().to_string(), self.resources.len());
                self.resources.push(descriptor);
            }
        }
    }

    /// List every registered resource.
    ///
    /// `cursor` is accepted for interface compatibility but ignored: the full
    /// set is returned on every call and no continuation token is produced.
    pub async fn list_resources(&self, cursor: Option<&str>) -> ListResourcesResponse {
        if let Some(cursor) = cursor {
            debug!("Ignoring pagination cursor {:?}; returning all resources", cursor);
        }

        ListResourcesResponse {
            resources: self.descriptors().map(ResourceDescriptor::marshal).collect(),
        }
    }

    /// List resource templates. Always empty.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.values().cloned().collect()
    }

    /// Resolve a resource's content.
    ///
    /// Producer failures, including panics, are reported as
    /// [`ResourceError::Fetch`] with the original failure as the source.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResponse, ResourceError> {
        let descriptor = self.get(uri).ok_or_else(|| ResourceError::not_found(uri))?;

        let outcome = AssertUnwindSafe(descriptor.fetch()).catch_unwind().await;
        let result = outcome.unwrap_or_else(|payload| Err(FetchError::Panic(panic_message(payload))));

        match result {
            Ok(text) => Ok(ReadResourceResponse {
                uri: descriptor.uri().to_string(),
                mime_type: descriptor.media_type().to_string(),
                text,
            }),
            Err(source) => {
                let err = ResourceError::fetch(uri, source);
                warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Iterate over all descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.iter()
    }

    /// Look up a descriptor by URI.
    pub fn get(&self, uri: &str) -> Option<&ResourceDescriptor> {
        self.index.get(uri).map(|&pos| &self.resources[pos])
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.index.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "producer panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::fetcher::{FileFetcher, fetch_fn};
    use std::error::Error as _;

    fn readme_registry() -> ResourceRegistry {
        let mut registry = ResourceRegistry::new();
        registry.add_simple_resource(
            "file:///readme.txt",
            "text/plain",
            "hello",
            ResourceOptions::default(),
        );
        registry
    }

    #[tokio::test]
    async fn test_list_readme_example() {
        let registry = readme_registry();

        let listing = serde_json::to_value(registry.list_resources(None).await).unwrap();
        assert_eq!(
            listing,
            serde_json::json!({
                "resources": [{
                    "uri": "file:///readme.txt",
                    "name": "readme.txt",
                    "title": "readme.txt",
                    "description": "readme.txt resource",
                    "mimeType": "text/plain"
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_read_readme_example() {
        let registry = readme_registry();

        let response = registry.read_resource("file:///readme.txt").await.unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "uri": "file:///readme.txt",
                "mimeType": "text/plain",
                "text": "hello"
            })
        );
    }

    #[tokio::test]
    async fn test_list_one_entry_per_uri() {
        let mut registry = ResourceRegistry::new();
        registry.add_simple_resource("mcp://a/one", "text/plain", "1", ResourceOptions::new());
        registry.add_simple_resource("mcp://a/two", "application/json", "{}", ResourceOptions::new());
        registry.add_simple_resource("mcp://a/one", "text/markdown", "# 1", ResourceOptions::new());

        let listing = registry.list_resources(None).await;
        assert_eq!(listing.resources.len(), 2);

        let one = listing
            .resources
            .iter()
            .find(|r| r.uri == "mcp://a/one")
            .unwrap();
        assert_eq!(one.mime_type, "text/markdown");
        let two = listing
            .resources
            .iter()
            .find(|r| r.uri == "mcp://a/two")
            .unwrap();
        assert_eq!(two.mime_type, "application/json");
    }

    #[tokio::test]
    async fn test_list_in_registration_order() {
        let mut registry = ResourceRegistry::new();
        for uri in ["mcp://z/last", "mcp://a/first", "mcp://m/middle"] {
            registry.add_simple_resource(uri, "text/plain", "x", ResourceOptions::new());
        }
        registry.add_simple_resource("mcp://a/first", "text/markdown", "y", ResourceOptions::new());

        let uris: Vec<String> = registry
            .list_resources(None)
            .await
            .resources
            .into_iter()
            .map(|r| r.uri)
            .collect();
        assert_eq!(uris, ["mcp://z/last", "mcp://a/first", "mcp://m/middle"]);
        assert_eq!(registry.get("mcp://a/first").unwrap().media_type(), "text/markdown");
    }

    #[tokio::test]
    async fn test_concurrent_reads_each_invoke_producer() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = ResourceRegistry::new();
        registry.add_resource(
            "mcp://counter/value",
            "text/plain",
            fetch_fn(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(ResourceData::from(format!("call {n}"))) }
            }),
            ResourceOptions::new(),
        );

        let (first, second) = tokio::join!(
            registry.read_resource("mcp://counter/value"),
            registry.read_resource("mcp://counter/value")
        );
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_ne!(first.unwrap().text, second.unwrap().text);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cursor_is_ignored() {
        let registry = readme_registry();
        let without = registry.list_resources(None).await;
        let with = registry.list_resources(Some("page-2")).await;
        assert_eq!(without, with);
    }

    #[tokio::test]
    async fn test_reregistration_replaces() {
        let mut registry = readme_registry();
        registry.add_simple_resource(
            "file:///readme.txt",
            "text/markdown",
            "goodbye",
            ResourceOptions::new().title("Updated"),
        );

        assert_eq!(registry.len(), 1);
        let response = registry.read_resource("file:///readme.txt").await.unwrap();
        assert_eq!(response.text.as_text(), Some("goodbye"));
        assert_eq!(response.mime_type, "text/markdown");

        let listing = registry.list_resources(None).await;
        assert_eq!(listing.resources[0].title, "Updated");
        assert_eq!(listing.resources[0].description, "Updated");
    }

    #[tokio::test]
    async fn test_read_binary_keeps_bytes() {
        let mut registry = ResourceRegistry::new();
        registry.add_simple_resource(
            "mcp://blobs/logo.png",
            "image/png",
            vec![0x89u8, 0x50, 0x4e, 0x47],
            ResourceOptions::new(),
        );

        let response = registry.read_resource("mcp://blobs/logo.png").await.unwrap();
        assert_eq!(response.text, ResourceData::Binary(vec![0x89, 0x50, 0x4e, 0x47]));

        match response.into_contents() {
            ResourceContents::BlobResourceContents { blob, mime_type, .. } => {
                assert_eq!(blob, "iVBORw==");
                assert_eq!(mime_type.as_deref(), Some("image/png"));
            }
            other => panic!("Expected blob contents, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_unknown_is_not_found() {
        let empty = ResourceRegistry::new();
        let err = empty.read_resource("nonexistent://x").await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
        assert_eq!(err.to_string(), "Resource not found");

        let registry = readme_registry();
        let err = registry.read_resource("nonexistent://x").await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_read_failing_producer() {
        let mut registry = ResourceRegistry::new();
        registry.add_resource(
            "mcp://remote/feed",
            "application/json",
            fetch_fn(|| async { Err(FetchError::unavailable("upstream timed out")) }),
            ResourceOptions::new(),
        );

        let err = registry.read_resource("mcp://remote/feed").await.unwrap_err();
        assert!(matches!(err, ResourceError::Fetch { .. }));
        let message = err.to_string();
        assert!(message.contains("mcp://remote/feed"));
        assert!(message.contains("upstream timed out"));
        assert_eq!(
            message,
            "Error reading resource mcp://remote/feed: Unavailable: upstream timed out"
        );
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ResourceRegistry::new();
        registry.add_resource(
            "file:///gone.txt",
            "text/plain",
            FileFetcher::new(dir.path().join("gone.txt")),
            ResourceOptions::new(),
        );

        let err = registry.read_resource("file:///gone.txt").await.unwrap_err();
        assert!(err.to_string().starts_with("Error reading resource file:///gone.txt: IoError: "));
    }

    #[tokio::test]
    async fn test_read_panicking_producer() {
        let mut registry = ResourceRegistry::new();
        registry.add_resource(
            "mcp://broken/thing",
            "text/plain",
            fetch_fn(|| async {
                if true {
                    panic!("producer exploded");
                }
                Ok(ResourceData::from("unreachable"))
            }),
            ResourceOptions::new(),
        );

        let err = registry.read_resource("mcp://broken/thing").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error reading resource mcp://broken/thing: Panic: producer exploded"
        );
    }

    #[tokio::test]
    async fn test_templates_are_empty() {
        let registry = readme_registry();
        assert!(registry.list_resource_templates().await.is_empty());
    }

    #[test]
    fn test_bookkeeping() {
        let registry = readme_registry();
        assert!(!registry.is_empty());
        assert!(registry.contains("file:///readme.txt"));
        assert!(!registry.contains("file:///other.txt"));
        assert_eq!(registry.get("file:///readme.txt").unwrap().name(), "readme.txt");
        assert!(ResourceRegistry::new().is_empty());
    }
}
