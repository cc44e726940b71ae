//! Flow state storage: state token -> code verifier.
//!
//! Entries are single-use. `find_and_delete` removes the entry under the write lock,
//! so two callbacks racing on the same state token cannot both obtain the verifier.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::types::FlowState;
use crate::config::defaults;

/// Storage for pending login flows.
///
/// The in-memory implementation is scoped to one process; running several instances
/// behind a load balancer needs an implementation backed by a shared store.
#[async_trait]
pub trait FlowStateStore: Send + Sync {
    /// Insert or overwrite the verifier for a state token.
    async fn put(&self, state: String, code_verifier: String, ttl: Duration);

    /// Atomically take the verifier for a state token.
    ///
    /// Returns `None` if the state was never stored, was already taken, or has expired.
    async fn find_and_delete(&self, state: &str) -> Option<String>;
}

/// In-memory flow store.
///
/// Holds at most `max_entries` flows. When full, expired flows are swept first and
/// then the oldest pending flow is evicted.
#[derive(Clone)]
pub struct MemoryFlowStore {
    flows: Arc<RwLock<HashMap<String, FlowState>>>,
    max_entries: usize,
}

impl Default for MemoryFlowStore {
    fn default() -> Self {
        Self::with_max_entries(defaults::MAX_PENDING_FLOWS)
    }
}

impl MemoryFlowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding at most `max_entries` pending flows.
    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self { flows: Arc::new(RwLock::new(HashMap::new())), max_entries: max_entries.max(1) }
    }

    /// Number of stored flows, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.flows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flows.read().await.is_empty()
    }

    /// Start background cleanup of expired flows.
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.cleanup_expired().await;
            }
        })
    }

    /// Remove expired flows. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut flows = self.flows.write().await;
        let before = flows.len();
        flows.retain(|_, flow| !flow.is_expired());
        let removed = before - flows.len();
        if removed > 0 {
            tracing::debug!(count = removed, "Cleaned up expired login flows");
        }
        removed
    }
}

#[async_trait]
impl FlowStateStore for MemoryFlowStore {
    async fn put(&self, state: String, code_verifier: String, ttl: Duration) {
        let mut flows = self.flows.write().await;

        if flows.len() >= self.max_entries && !flows.contains_key(&state) {
            flows.retain(|_, flow| !flow.is_expired());
        }
        while flows.len() >= self.max_entries && !flows.contains_key(&state) {
            let Some(oldest) =
                flows.iter().min_by_key(|(_, flow)| flow.created_at).map(|(key, _)| key.clone())
            else {
                break;
            };
            flows.remove(&oldest);
            tracing::warn!(max_entries = self.max_entries, "Flow store full, evicted oldest login");
        }

        flows.insert(state, FlowState::new(code_verifier, ttl));
    }

    async fn find_and_delete(&self, state: &str) -> Option<String> {
        let flow = self.flows.write().await.remove(state)?;
        if flow.is_expired() {
            return None;
        }
        Some(flow.code_verifier)
    }
}

impl std::fmt::Debug for MemoryFlowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryFlowStore").field("max_entries", &self.max_entries).finish()
    }
}
