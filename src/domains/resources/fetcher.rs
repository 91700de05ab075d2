//! Content producers for resources.
//!
//! A [`ResourceFetcher`] is invoked every time a resource is read and yields
//! its current content. The registry does not care where content comes from:
//! a captured value, a file on disk and a computed document all satisfy the
//! same trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

use super::error::FetchError;

/// Content yielded by a producer.
///
/// Serialized untagged, so text appears as a JSON string and binary as an
/// array of octets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceData {
    /// UTF-8 text content.
    Text(String),

    /// Raw binary content.
    Binary(Vec<u8>),
}

impl ResourceData {
    /// Returns the text content, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// Length of the content in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(data) => data.len(),
        }
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for ResourceData {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ResourceData {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ResourceData {
    fn from(data: Vec<u8>) -> Self {
        Self::Binary(data)
    }
}

impl From<&[u8]> for ResourceData {
    fn from(data: &[u8]) -> Self {
        Self::Binary(data.to_vec())
    }
}

/// Deferred, zero-argument producer of resource content.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Produce the resource's current content.
    async fn fetch(&self) -> Result<ResourceData, FetchError>;
}

/// Producer returning a value captured at registration.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    data: ResourceData,
}

impl StaticFetcher {
    /// Capture `data` by value.
    pub fn new(data: impl Into<ResourceData>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl ResourceFetcher for StaticFetcher {
    async fn fetch(&self) -> Result<ResourceData, FetchError> {
        Ok(self.data.clone())
    }
}

/// Producer reading a file from disk on every fetch.
///
/// Content that is valid UTF-8 is returned as text, anything else as binary.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    /// Create a fetcher for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this fetcher reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResourceFetcher for FileFetcher {
    async fn fetch(&self) -> Result<ResourceData, FetchError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => ResourceData::Text(text),
            Err(e) => ResourceData::Binary(e.into_bytes()),
        })
    }
}

/// Producer backed by an async closure.
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap an async closure as a [`ResourceFetcher`].
pub fn fetch_fn<F, Fut>(f: F) -> FnFetcher<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResourceData, FetchError>> + Send + 'static,
{
    FnFetcher { f }
}

#[async_trait]
impl<F, Fut> ResourceFetcher for FnFetcher<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResourceData, FetchError>> + Send + 'static,
{
    async fn fetch(&self) -> Result<ResourceData, FetchError> {
        (self.f)().await
    }
}
