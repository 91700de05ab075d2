//! Resource-specific error types.
//!
//! Two layers: [`FetchError`] is what a content producer returns when it
//! cannot yield content, and [`ResourceError`] is what the registry signals
//! to the protocol layer.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// JSON-RPC code for the invalid-parameter error class.
pub const INVALID_PARAMS_CODE: i32 = -32602;

/// JSON-RPC code for the internal-error class.
pub const INTERNAL_ERROR_CODE: i32 = -32603;

/// Failure raised by a resource's content producer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reading the underlying content failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Rendering structured content failed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// The content is currently unavailable.
    #[error("{0}")]
    Unavailable(String),

    /// The producer panicked while running.
    #[error("{0}")]
    Panic(String),
}

impl FetchError {
    /// Create an "unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Short name of the failure kind, embedded in fetch-failure messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
            Self::Unavailable(_) => "Unavailable",
            Self::Panic(_) => "Panic",
        }
    }
}

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("Resource not found")]
    NotFound { uri: String },

    /// The resource's producer failed while reading it.
    #[error("Error reading resource {}: {}: {}", .uri, .source.kind(), .source)]
    Fetch {
        uri: String,
        #[source]
        source: FetchError,
    },
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound { uri: uri.into() }
    }

    /// Create a new fetch-failure error wrapping the producer's failure.
    pub fn fetch(uri: impl Into<String>, source: FetchError) -> Self {
        Self::Fetch {
            uri: uri.into(),
            source,
        }
    }

    /// The URI the failed request targeted.
    pub fn uri(&self) -> &str {
        match self {
            Self::NotFound { uri } | Self::Fetch { uri, .. } => uri,
        }
    }

    /// JSON-RPC error code for this condition.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => INVALID_PARAMS_CODE,
            Self::Fetch { .. } => INTERNAL_ERROR_CODE,
        }
    }
}

impl From<ResourceError> for McpError {
    fn from(err: ResourceError) -> Self {
        match &err {
            ResourceError::NotFound { uri } => McpError::invalid_params(
                err.to_string(),
                Some(serde_json::json!({ "uri": uri })),
            ),
            ResourceError::Fetch { .. } => McpError::internal_error(err.to_string(), None),
        }
    }
}
