//! STDIO transport implementation.
//!
//! The default MCP mode: one session over the process's stdin/stdout.
//! Logging must go to stderr while this transport runs.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single session until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let resources = server.registry().len();

        let session = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        info!("Ready - serving {} resources via stdin/stdout", resources);

        let reason = session
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO session ended: {:?}", reason);
        Ok(())
    }
}
