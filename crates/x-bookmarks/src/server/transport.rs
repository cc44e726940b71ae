//! HTTP router and shared handler state.

use std::sync::Arc;

use axum::{Json, Router, response::IntoResponse, routing::get};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::session::TokenSink;
use crate::oauth::OAuthFlow;

/// Default cap on concurrently handled requests.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 512;

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub flow: OAuthFlow,
    pub sessions: Arc<dyn TokenSink>,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

/// Create the HTTP router for the login endpoints.
pub fn create_router(state: Arc<HttpState>, max_concurrent_requests: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/oauth/authorize", get(handlers::handle_authorize))
        .route("/oauth/callback", get(handlers::handle_callback))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "x-bookmarks",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
