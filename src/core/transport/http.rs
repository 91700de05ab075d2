//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests, so plain HTTP clients
//! (curl, browsers, etc.) can list and read resources.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::McpServer;
use crate::domains::resources::{INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE, ResourceError};

/// Protocol version reported by `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = INVALID_PARAMS_CODE;
    pub const INTERNAL_ERROR: i32 = INTERNAL_ERROR_CODE;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<ResourceError> for JsonRpcError {
    fn from(err: ResourceError) -> Self {
        let data = serde_json::json!({ "uri": err.uri() });
        Self::new(err.code(), err.to_string()).with_data(data)
    }
}

impl JsonRpcResponse {
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<serde_json::Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Serialize `value` as the result, or fail with an internal error.
    fn from_serialized(id: Option<serde_json::Value>, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(result) => Self::success(id, result),
            Err(e) => {
                let error = JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, e.to_string());
                Self::failure(id, error)
            }
        }
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
    /// Last `initialize` handshake seen on this endpoint.
    session: Arc<RwLock<Option<SessionState>>>,
}

impl AppState {
    /// Create handler state for `server` with no session yet.
    pub fn new(server: McpServer) -> Self {
        Self {
            server,
            session: Arc::new(RwLock::new(None)),
        }
    }
}

/// Handshake state.
#[derive(Debug, Clone)]
struct SessionState {
    initialized: bool,
    protocol_version: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.listen.to_string()
    }

    /// Build the axum router for this transport.
    pub fn router(&self, server: McpServer) -> Router {
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(AppState::new(server));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "HTTP transport listening on {} (rpc: POST {}, health: GET /health, CORS {})",
            addr, self.config.rpc_path, cors_status
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Describes the server and the methods the RPC endpoint understands.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "methods": ["initialize", "resources/list", "resources/templates/list", "resources/read"]
    }))
}

/// Liveness probe with the current resource count.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "resources": state.server.registry().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// POST handler for the RPC endpoint.
#[instrument(skip_all, fields(method = tracing::field::Empty))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Dispatch one JSON-RPC request to its method handler.
pub async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        let error = JsonRpcError::new(JsonRpcError::INVALID_REQUEST, "Invalid Request");
        return JsonRpcResponse::failure(request.id, error);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request).await,
        "resources/list" => handle_resources_list(state, request).await,
        "resources/templates/list" => handle_resources_templates_list(state, request).await,
        "resources/read" => handle_resources_read(state, request).await,

        // Acknowledged with a null result
        method if method.starts_with("notifications/") => {
            handle_notification(state, &request).await;
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            let error = JsonRpcError::new(JsonRpcError::METHOD_NOT_FOUND, "Method not found");
            JsonRpcResponse::failure(request.id, error)
        }
    }
}

/// Handle initialize request.
async fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let mut session = state.session.write().await;
    *session = Some(SessionState {
        initialized: false,
        protocol_version: PROTOCOL_VERSION.to_string(),
    });

    let result = serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "resources": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": state.server.instructions()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle resources/list request.
///
/// A `cursor` parameter is accepted but has no effect.
async fn handle_resources_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/list request");

    let cursor = request
        .params
        .as_ref()
        .and_then(|p| p.get("cursor"))
        .and_then(|c| c.as_str());

    let listing = state.server.registry().list_resources(cursor).await;
    JsonRpcResponse::from_serialized(request.id, listing)
}

/// Handle resources/templates/list request.
async fn handle_resources_templates_list(
    state: &AppState,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    info!("Processing resources/templates/list request");

    let templates = state.server.registry().list_resource_templates().await;
    let result = serde_json::json!({
        "resourceTemplates": templates
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle resources/read request.
async fn handle_resources_read(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/read request");

    let uri = request
        .params
        .as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(|v| v.as_str());

    let Some(uri) = uri else {
        let error = JsonRpcError::new(JsonRpcError::INVALID_PARAMS, "Missing resource URI");
        return JsonRpcResponse::failure(request.id, error);
    };

    match state.server.read_contents(uri).await {
        Ok(result) => JsonRpcResponse::from_serialized(request.id, result),
        Err(e) => JsonRpcResponse::failure(request.id, e.into()),
    }
}

/// Record `notifications/initialized`; other notifications are only logged.
async fn handle_notification(state: &AppState, request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => {
            let mut session = state.session.write().await;
            if let Some(ref mut s) = *session {
                s.initialized = true;
                info!(
                    "Client initialized (protocol {})",
                    s.protocol_version
                );
            }
        }
        _ => {
            info!("Received notification: {}", request.method);
        }
    }
}
