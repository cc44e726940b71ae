//! Session persistence for exchanged tokens.
//!
//! The callback hands each [`TokenResponse`] to a [`TokenSink`] and gets back a
//! session id for the cookie. Downstream API calls look the access token up by
//! that id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::oauth::TokenResponse;

/// Receiver of successfully exchanged tokens.
#[async_trait]
pub trait TokenSink: Send + Sync {
    /// Persist a token and return the session id that refers to it.
    async fn persist(&self, token: TokenResponse) -> String;
}

/// A token held for a signed-in session.
pub struct StoredToken {
    pub token: TokenResponse,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    fn new(token: TokenResponse, fallback_lifetime: Duration) -> Self {
        let stored_at = Utc::now();
        let lifetime = token.expires_in.map_or(fallback_lifetime, Duration::from_secs);
        let expires_at = chrono::Duration::from_std(lifetime)
            .ok()
            .and_then(|d| stored_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { token, stored_at, expires_at }
    }

    /// Check if the access token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory session store.
#[derive(Clone)]
pub struct MemorySessions {
    sessions: Arc<RwLock<HashMap<String, StoredToken>>>,
    fallback_lifetime: Duration,
}

impl MemorySessions {
    /// Create a store; tokens without `expires_in` live for `fallback_lifetime`.
    #[must_use]
    pub fn new(fallback_lifetime: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), fallback_lifetime }
    }

    /// Access token for a session, if present and unexpired.
    pub async fn access_token(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        let stored = sessions.get(session_id)?;
        if stored.is_expired() {
            return None;
        }
        Some(stored.token.access_token.clone())
    }

    /// Get the number of stored sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Start background cleanup of expired sessions.
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.cleanup_expired().await;
            }
        })
    }

    async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| !stored.is_expired());
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(count = removed, "Cleaned up expired sessions");
        }
        removed
    }
}

#[async_trait]
impl TokenSink for MemorySessions {
    async fn persist(&self, token: TokenResponse) -> String {
        let session_id = uuid::Uuid::new_v4().simple().to_string();
        let stored = StoredToken::new(token, self.fallback_lifetime);

        tracing::debug!(expires_at = %stored.expires_at, "Stored session token");
        self.sessions.write().await.insert(session_id.clone(), stored);

        session_id
    }
}

impl std::fmt::Debug for MemorySessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessions").field("fallback_lifetime", &self.fallback_lifetime).finish()
    }
}
