//! HTTP server for the login flow.
//!
//! Owns the process-wide stores: they are created here at startup and handed to
//! the handlers through [`transport::HttpState`].

pub mod handlers;
pub mod session;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use crate::config::Config;
use crate::error::AuthResult;
use crate::oauth::{MemoryFlowStore, OAuthFlow};
use session::MemorySessions;
use transport::{DEFAULT_MAX_CONCURRENT_REQUESTS, HttpState};

/// Login server.
pub struct AuthServer {
    config: Arc<Config>,
    flows: Arc<MemoryFlowStore>,
    sessions: Arc<MemorySessions>,
    state: Arc<HttpState>,
    max_concurrent_requests: usize,
}

impl AuthServer {
    /// Create a server with fresh in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token endpoint is unusable.
    pub fn new(config: Config) -> AuthResult<Self> {
        let config = Arc::new(config);
        let flows = Arc::new(MemoryFlowStore::with_max_entries(config.max_pending_flows));
        let sessions = Arc::new(MemorySessions::new(config.session_lifetime));

        let flow = OAuthFlow::new(Arc::clone(&config), flows.clone())?;
        let state = Arc::new(HttpState {
            flow,
            sessions: sessions.clone(),
            secure_cookies: config.secure_cookies,
        });

        Ok(Self {
            config,
            flows,
            sessions,
            state,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        })
    }

    /// Set the cap on concurrently handled requests.
    #[must_use]
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit.max(1);
        self
    }

    /// Build the router.
    #[must_use]
    pub fn router(&self) -> Router {
        transport::create_router(Arc::clone(&self.state), self.max_concurrent_requests)
    }

    /// Pending login flows.
    #[must_use]
    pub fn flows(&self) -> &Arc<MemoryFlowStore> {
        &self.flows
    }

    /// Signed-in sessions.
    #[must_use]
    pub fn sessions(&self) -> &Arc<MemorySessions> {
        &self.sessions
    }

    /// Run the server.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!(
            authorization_uri = %self.config.authorization_uri,
            token_uri = %self.config.token_uri,
            flow_ttl_secs = self.config.flow_ttl.as_secs(),
            "Starting login server on port {}",
            port
        );

        let flow_sweeper = Arc::clone(&self.flows).start_cleanup_task(self.config.cleanup_interval);
        let session_sweeper =
            Arc::clone(&self.sessions).start_cleanup_task(self.config.cleanup_interval);

        let router = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("HTTP server listening on http://{}", addr);
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        flow_sweeper.abort();
        session_sweeper.abort();
        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for AuthServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServer").field("config", &self.config).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
