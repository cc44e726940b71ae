//! OAuth 2.0 types for the login flow.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// A pending login, keyed by its state token in the flow store.
pub struct FlowState {
    pub code_verifier: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl FlowState {
    pub fn new(code_verifier: String, ttl: Duration) -> Self {
        Self { code_verifier, created_at: Instant::now(), ttl }
    }

    /// Check if the flow has outlived its TTL.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Successful response from the provider's token endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}
