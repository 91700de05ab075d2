//! File resources exposed from a base directory.

use std::path::Path;
use tracing::{debug, warn};
use url::Url;

use crate::core::Result;
use crate::domains::resources::{FileFetcher, ResourceOptions, ResourceRegistry};

/// Register every regular file directly inside `dir` as a `file://` resource.
///
/// Subdirectories are not descended into. Returns the number of files
/// registered.
pub fn register_directory(registry: &mut ResourceRegistry, dir: &Path) -> Result<usize> {
    let dir = dir.canonicalize()?;

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    for path in &paths {
        let uri = match Url::from_file_path(path) {
            Ok(url) => url.to_string(),
            Err(()) => {
                warn!("Skipping file with non-absolute path: {}", path.display());
                continue;
            }
        };
        let media_type = guess_media_type(path);
        debug!("Exposing {} as {} ({})", path.display(), uri, media_type);

        // The URI is percent-encoded; name the resource after the file itself
        let mut options = ResourceOptions::new();
        if let Some(file_name) = path.file_name() {
            options = options.name(file_name.to_string_lossy());
        }

        registry.add_resource(uri, media_type, FileFetcher::new(path.clone()), options);
    }

    Ok(paths.len())
}

/// Guess a MIME type from the file extension.
pub fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "rs" => "text/x-rust",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type(Path::new("readme.txt")), "text/plain");
        assert_eq!(guess_media_type(Path::new("NOTES.MD")), "text/markdown");
        assert_eq!(guess_media_type(Path::new("data.json")), "application/json");
        assert_eq!(guess_media_type(Path::new("archive")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_register_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("data.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("skip.txt"), "no").unwrap();

        let mut registry = ResourceRegistry::new();
        let count = register_directory(&mut registry, dir.path()).unwrap();
        assert_eq!(count, 2);

        let readme = registry
            .descriptors()
            .find(|d| d.name() == "readme.txt")
            .unwrap();
        assert!(readme.uri().starts_with("file:///"));
        assert_eq!(readme.media_type(), "text/plain");
        assert_eq!(readme.description(), "readme.txt resource");

        let uri = readme.uri().to_string();
        let response = registry.read_resource(&uri).await.unwrap();
        assert_eq!(response.text.as_text(), Some("hello"));
    }

    #[tokio::test]
    async fn test_file_names_are_not_encoded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my notes.txt"), "spaced").unwrap();
        std::fs::write(dir.path().join("résumé.md"), "accented").unwrap();

        let mut registry = ResourceRegistry::new();
        register_directory(&mut registry, dir.path()).unwrap();

        let notes = registry
            .descriptors()
            .find(|d| d.name() == "my notes.txt")
            .unwrap();
        assert!(notes.uri().ends_with("/my%20notes.txt"));
        assert_eq!(notes.title(), "my notes.txt");
        assert_eq!(notes.description(), "my notes.txt resource");
        assert!(registry.descriptors().any(|d| d.name() == "résumé.md"));

        let uri = notes.uri().to_string();
        let response = registry.read_resource(&uri).await.unwrap();
        assert_eq!(response.text.as_text(), Some("spaced"));
    }

    #[tokio::test]
    async fn test_file_changes_are_visible() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("live.txt");
        std::fs::write(&file, "v1").unwrap();

        let mut registry = ResourceRegistry::new();
        register_directory(&mut registry, dir.path()).unwrap();
        let uri = registry.descriptors().next().unwrap().uri().to_string();

        std::fs::write(&file, "v2").unwrap();
        let response = registry.read_resource(&uri).await.unwrap();
        assert_eq!(response.text.as_text(), Some("v2"));
    }
}
