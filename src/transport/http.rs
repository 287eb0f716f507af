//! Streamable HTTP transport for the MCP server.

use crate::error::{DbError, DbResult};
use crate::mcp::GatewayService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Upper bound on draining open streams after a shutdown signal.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// Serves the gateway over HTTP; each session gets a clone of the service,
/// so all sessions share the same pools and tool descriptions.
pub struct HttpTransport {
    service: GatewayService,
    host: String,
    port: u16,
    /// MCP endpoint path
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        service: GatewayService,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            service,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> DbResult<()> {
        let bind_addr = self.bind_addr();
        info!("Starting MCP server with HTTP transport on {}", bind_addr);

        let service = self.service.clone();
        let http_service = StreamableHttpService::new(
            move || Ok(service.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service rejects "/"
        let app = if self.endpoint == "/" {
            axum::Router::new().fallback_service(http_service)
        } else {
            axum::Router::new().nest_service(&self.endpoint, http_service)
        };

        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            DbError::connection(
                format!("Failed to bind to {}: {}", bind_addr, e),
                "Check that the port is available",
            )
        })?;

        info!(endpoint = %self.endpoint, "MCP endpoint ready");

        let shutdown_notify = Arc::new(tokio::sync::Notify::new());
        let shutdown_trigger = shutdown_notify.clone();
        let shutdown_signal = async move {
            wait_for_signal().await;
            shutdown_trigger.notify_one();
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

        // Open SSE streams can hold the server forever; cap the drain.
        tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!(error = %e, "HTTP server error");
                    self.service.connection_manager().close_all().await;
                    return Err(DbError::internal(format!("HTTP server error: {}", e)));
                }
                info!("HTTP server stopped");
            }
            _ = async {
                shutdown_notify.notified().await;
                info!(
                    timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                    "Waiting for connections to close (send signal again to force exit)..."
                );
                tokio::select! {
                    _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                        warn!("Graceful shutdown timeout, forcing exit");
                    }
                    _ = wait_for_signal() => {
                        warn!("Received second signal, forcing immediate exit");
                    }
                }
            } => {}
        }

        info!("Closing database connections");
        self.service.connection_manager().close_all().await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, DatabaseSet, PoolSettings};
    use crate::db::ConnectionManager;

    fn service() -> GatewayService {
        let set = DatabaseSet::from_configs([DatabaseConfig::sqlite("db1", "/tmp/x.db")]).unwrap();
        let manager =
            ConnectionManager::initialize(Arc::new(set), PoolSettings::default()).unwrap();
        GatewayService::new(Arc::new(manager), String::new())
    }

    #[tokio::test]
    async fn test_http_transport_bind_addr() {
        let transport = HttpTransport::new(service(), "0.0.0.0", 3000, "/api/mcp");
        assert_eq!(transport.name(), "http");
        assert_eq!(transport.bind_addr(), "0.0.0.0:3000");
        assert_eq!(transport.endpoint(), "/api/mcp");
    }

    #[tokio::test]
    async fn test_http_transport_bind_failure() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();
        let transport = HttpTransport::new(service(), "127.0.0.1", port, "/mcp");
        let err = transport.run().await.unwrap_err();
        assert!(matches!(err, DbError::Connection { .. }));
    }
}
