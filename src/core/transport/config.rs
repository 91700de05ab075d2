//! Transport configuration types.
//!
//! Which variants exist depends on the enabled cargo features; the default
//! is the first enabled of STDIO, TCP and HTTP.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selected transport and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// One session over stdin/stdout.
    #[cfg(feature = "stdio")]
    Stdio,

    /// Line-delimited JSON-RPC over TCP, one session per connection.
    #[cfg(feature = "tcp")]
    Tcp(ListenAddr),

    /// JSON-RPC over HTTP POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// Host and port a network transport binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenAddr {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ListenAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Read `<prefix>_HOST` and `<prefix>_PORT`, keeping defaults for
    /// missing or unparsable values.
    pub fn from_env(prefix: &str, default_port: u16) -> Self {
        let host = std::env::var(format!("{prefix}_HOST")).unwrap_or_else(|_| default_host());
        let port = std::env::var(format!("{prefix}_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(default_port);
        Self { host, port }
    }
}

impl fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(flatten)]
    pub listen: ListenAddr,

    /// Path of the JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Allow cross-origin requests from browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

pub const DEFAULT_TCP_PORT: u16 = 3000;
pub const DEFAULT_HTTP_PORT: u16 = 8080;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_path() -> String {
    "/mcp".to_string()
}

fn default_cors() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: ListenAddr::new(default_host(), DEFAULT_HTTP_PORT),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl HttpConfig {
    /// Read `MCP_HTTP_HOST`, `MCP_HTTP_PORT`, `MCP_HTTP_PATH` and `MCP_HTTP_CORS`.
    pub fn from_env() -> Self {
        Self {
            listen: ListenAddr::from_env("MCP_HTTP", DEFAULT_HTTP_PORT),
            rpc_path: std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path()),
            enable_cors: std::env::var("MCP_HTTP_CORS")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0"))
                .unwrap_or_else(|_| default_cors()),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            return Self::Tcp(ListenAddr::new(default_host(), DEFAULT_TCP_PORT));
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

impl TransportConfig {
    /// Select the transport from `MCP_TRANSPORT` (`stdio`, `tcp` or `http`).
    ///
    /// Unknown names, and names whose feature is disabled, give the default.
    pub fn from_env() -> Self {
        let name = std::env::var("MCP_TRANSPORT").unwrap_or_default();
        Self::from_name(&name).unwrap_or_default()
    }

    /// Build the config for a transport name, reading its settings from the
    /// environment. Returns `None` if the transport is unknown or disabled.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Some(Self::Stdio),
            #[cfg(feature = "tcp")]
            "tcp" => Some(Self::Tcp(ListenAddr::from_env("MCP_TCP", DEFAULT_TCP_PORT))),
            #[cfg(feature = "http")]
            "http" => Some(Self::Http(HttpConfig::from_env())),
            _ => None,
        }
    }

    /// Human-readable summary for logs.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(addr) => format!("TCP on {addr}"),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}{}", cfg.listen, cfg.rpc_path),
        }
    }

    /// Whether stdout is reserved for protocol traffic.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}
