//! Resource definitions module.
//!
//! Built-in resources are defined one per file and registered at startup
//! by [`build_registry`], together with any files exposed from the
//! configured base directory.
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Register it in `build_registry()`

mod docs_readme;
mod files;
mod server_info;

pub use docs_readme::DocsReadmeResource;
pub use files::{guess_media_type, register_directory};
pub use server_info::ServerInfoResource;

use tracing::info;

use super::registry::ResourceRegistry;
use crate::core::{Config, Result};

/// Trait for built-in resource definitions.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The human-readable title of the resource.
    const TITLE: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Add this resource to `registry`.
    fn register(registry: &mut ResourceRegistry, config: &Config);
}

/// Build the registry the server starts with.
pub fn build_registry(config: &Config) -> Result<ResourceRegistry> {
    let mut registry = ResourceRegistry::new();

    if config.resources.include_builtin {
        ServerInfoResource::register(&mut registry, config);
        DocsReadmeResource::register(&mut registry, config);
    }

    if let Some(base_path) = &config.resources.base_path {
        info!("Exposing files from {}", base_path.display());
        let count = register_directory(&mut registry, base_path)?;
        info!("Registered {} file resources from {}", count, base_path.display());
    }

    info!("Resource registry ready with {} resources", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_builtin() {
        let registry = build_registry(&Config::default()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(ServerInfoResource::URI));
        assert!(registry.contains(DocsReadmeResource::URI));
    }

    #[test]
    fn test_build_registry_without_builtin() {
        let mut config = Config::default();
        config.resources.include_builtin = false;

        let registry = build_registry(&config).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_build_registry_with_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "# Notes").unwrap();

        let mut config = Config::default();
        config.resources.base_path = Some(dir.path().to_path_buf());

        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.len(), 3);

        let names: Vec<&str> = registry.descriptors().map(|d| d.name()).collect();
        assert_eq!(names, ["info", "readme", "notes.md"]);
    }

    #[test]
    fn test_build_registry_missing_base_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.resources.base_path = Some(dir.path().join("does-not-exist"));

        assert!(build_registry(&config).is_err());
    }
}
