//! TCP transport implementation.
//!
//! Line-delimited JSON-RPC over raw TCP sockets. Each accepted connection
//! gets its own MCP session; all sessions share one resource registry.

use rmcp::ServiceExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use super::{ListenAddr, TransportError, TransportResult};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    addr: ListenAddr,
    active: Arc<AtomicUsize>,
}

impl TcpTransport {
    /// Create a TCP transport bound to `addr` once run.
    pub fn new(addr: ListenAddr) -> Self {
        Self {
            addr,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Number of connections currently being served.
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Accept connections forever. Fails only if the listener cannot bind.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            "Ready - listening on {} (JSON-RPC over TCP, {} resources)",
            addr,
            server.registry().len()
        );

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Avoid spinning on persistent accept errors
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
            }

            let active = self.active.clone();
            let count = active.fetch_add(1, Ordering::Relaxed) + 1;
            info!("Accepted connection from {} ({} active)", peer, count);

            let server = server.clone();
            tokio::spawn(async move {
                serve_connection(server, stream, peer).await;
                active.fetch_sub(1, Ordering::Relaxed);
            });
        }
    }
}

/// Serve one client until it disconnects.
async fn serve_connection(server: McpServer, stream: TcpStream, peer: SocketAddr) {
    let service = match server.serve(stream).await {
        Ok(service) => service,
        Err(e) => {
            warn!("Failed to initialize session for {}: {}", peer, e);
            return;
        }
    };

    match service.waiting().await {
        Ok(reason) => info!("Client {} disconnected: {:?}", peer, reason),
        Err(e) => warn!("Error while serving client {}: {:?}", peer, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address() {
        let transport = TcpTransport::new(ListenAddr::new("0.0.0.0", 4100));
        assert_eq!(transport.address(), "0.0.0.0:4100");
        assert_eq!(transport.active_connections(), 0);
    }
}
