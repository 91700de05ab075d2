//! Resource descriptors: metadata paired with a content producer.

use rmcp::model::{AnnotateAble, RawResource, Resource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::error::FetchError;
use super::fetcher::{ResourceData, ResourceFetcher};

/// Optional metadata supplied at registration.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine identifier.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the human-readable label.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Wire projection of a descriptor.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// One addressable content item.
#[derive(Clone)]
pub struct ResourceDescriptor {
    uri: String,
    name: String,
    title: String,
    description: String,
    media_type: String,
    fetcher: Arc<dyn ResourceFetcher>,
}

impl ResourceDescriptor {
    /// Build a descriptor, filling in missing metadata.
    ///
    /// `name` defaults to the last path segment of `uri`, `description` to
    /// the supplied title or `"<name> resource"`, and `title` to `name`.
    pub fn new(
        uri: impl Into<String>,
        media_type: impl Into<String>,
        fetcher: Arc<dyn ResourceFetcher>,
        options: ResourceOptions,
    ) -> Self {
        let uri = uri.into();
        let ResourceOptions {
            name,
            title,
            description,
        } = options;

        let title = non_empty(title);
        let name = non_empty(name).unwrap_or_else(|| uri_basename(&uri));
        let description = non_empty(description)
            .or_else(|| title.clone())
            .unwrap_or_else(|| format!("{name} resource"));
        let title = title.unwrap_or_else(|| name.clone());

        Self {
            uri,
            name,
            title,
            description,
            media_type: media_type.into(),
            fetcher,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Invoke the producer.
    pub async fn fetch(&self) -> Result<ResourceData, FetchError> {
        self.fetcher.fetch().await
    }

    /// Project the metadata into its wire shape.
    pub fn marshal(&self) -> ResourceInfo {
        ResourceInfo {
            uri: self.uri.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            mime_type: self.media_type.clone(),
        }
    }

    /// Project the metadata into the SDK's resource type.
    pub fn to_resource(&self) -> Resource {
        let mut raw = RawResource::new(self.uri.clone(), self.name.clone());
        raw.title = Some(self.title.clone());
        raw.description = Some(self.description.clone());
        raw.mime_type = Some(self.media_type.clone());
        raw.no_annotation()
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("uri", &self.uri)
            .field("name", &self.name)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("media_type", &self.media_type)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Final segment of the URI's path component, exactly as written.
///
/// The path is taken from the raw string: a leading `scheme:` and
/// `//authority` are dropped and anything from the first `?` or `#` is cut.
/// No percent-encoding or dot-segment normalization is applied. When the
/// path has no final segment the whole URI is used, so the result is never
/// empty.
pub fn uri_basename(uri: &str) -> String {
    let mut rest = strip_scheme(uri);
    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        rest = &after[end..];
    }
    let path = &rest[..rest.find(['?', '#']).unwrap_or(rest.len())];

    match path.rsplit('/').next() {
        Some(base) if !base.is_empty() => base.to_string(),
        _ if !uri.is_empty() => uri.to_string(),
        _ => "resource".to_string(),
    }
}

/// Everything after a leading `scheme:`, or `uri` unchanged when it has none.
///
/// A scheme starts with an ASCII letter followed by letters, digits, `+`,
/// `-` or `.`.
fn strip_scheme(uri: &str) -> &str {
    let Some(colon) = uri.find(':') else {
        return uri;
    };
    let scheme = &uri[..colon];
    let valid = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid { &uri[colon + 1..] } else { uri }
}
