//! HTTP server lifecycle.

use crate::routes::create_router;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use routing_core::{EngineError, EngineResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// How long to drain in-flight requests on shutdown
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the bind port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the shutdown grace period
    #[must_use]
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}

/// The engine's HTTP server
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new server
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until a shutdown signal arrives
    ///
    /// # Errors
    /// Returns an error when the listener cannot bind or the server fails
    pub async fn run(self) -> EngineResult<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| EngineError::internal(format!("failed to bind {addr}: {e}")))?;

        let local_addr: SocketAddr = listener
            .local_addr()
            .map_err(|e| EngineError::internal(format!("failed to read local addr: {e}")))?;

        info!(addr = %local_addr, "Routing engine listening");

        let router = create_router(self.state);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(self.config.shutdown_grace))
            .await
            .map_err(|e| EngineError::internal(format!("server error: {e}")))?;

        info!("Routing engine stopped");
        Ok(())
    }
}
