//! OAuth 2.0 Authorization Code grant with PKCE, client side.
//!
//! ## Flow
//! 1. [`OAuthFlow::begin`] creates a verifier, its S256 challenge and a state token,
//!    stores `state -> verifier` and returns the provider authorization URL.
//! 2. The provider redirects back with `code` and `state`.
//! 3. [`OAuthFlow::complete`] takes the verifier for `state` exactly once and
//!    exchanges the code for a [`TokenResponse`].
//!
//! ## Supported Standards
//! - RFC 6749: Authorization Code Grant
//! - RFC 7636: PKCE (S256)

pub mod authorize;
pub mod exchange;
pub mod pkce;
pub mod store;
mod types;

use std::sync::Arc;

use url::Url;

use crate::config::Config;
use crate::error::{AuthError, AuthResult, GENERIC_AUTHORIZATION_FAILURE};

pub use exchange::TokenExchanger;
pub use store::{FlowStateStore, MemoryFlowStore};
pub use types::{FlowState, TokenResponse};

/// Login flow orchestrator shared by the HTTP handlers.
#[derive(Clone)]
pub struct OAuthFlow {
    config: Arc<Config>,
    store: Arc<dyn FlowStateStore>,
    exchanger: TokenExchanger,
}

impl OAuthFlow {
    /// Create a flow over the given store.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token endpoint is unusable.
    pub fn new(config: Arc<Config>, store: Arc<dyn FlowStateStore>) -> AuthResult<Self> {
        let exchanger = TokenExchanger::new(Arc::clone(&config), Arc::clone(&store))?;
        Ok(Self { config, store, exchanger })
    }

    /// Start a login: store a fresh verifier and return the authorization URL.
    ///
    /// Nothing is stored if the authorization URI is invalid.
    pub async fn begin(&self) -> AuthResult<Url> {
        let code_verifier = pkce::generate_verifier()
            .inspect_err(|e| tracing::error!(error = %e, "Secure randomness unavailable"))?;
        let code_challenge = pkce::generate_challenge(&code_verifier);
        let state = authorize::generate_state();

        let url = authorize::build_authorization_url(
            &self.config.authorization_uri,
            &self.config.client_id,
            &self.config.redirect_uri,
            &self.config.scope,
            &state,
            &code_challenge,
        )
        .inspect_err(|e| tracing::error!(error = %e, "Cannot build authorization URL"))?;

        self.store.put(state, code_verifier, self.config.flow_ttl).await;

        tracing::info!(host = url.host_str().unwrap_or_default(), "Redirecting to authorization URL");
        Ok(url)
    }

    /// Finish a login by exchanging `code` for a token.
    pub async fn complete(&self, code: &str, state: &str) -> AuthResult<TokenResponse> {
        self.exchanger.exchange_code_for_token(code, state).await
    }

    /// Abandon a login the provider did not authorize.
    ///
    /// The state is consumed so the flow cannot be completed later. Returns the error
    /// to surface: the provider's description, or [`AuthError::StateNotFound`] if the
    /// state is not pending.
    pub async fn abandon(&self, state: &str, description: Option<&str>) -> AuthError {
        if self.store.find_and_delete(state).await.is_none() {
            return AuthError::StateNotFound;
        }

        let message = description.unwrap_or(GENERIC_AUTHORIZATION_FAILURE);
        tracing::warn!(error = %message, "Provider did not authorize login");
        AuthError::upstream_api(message)
    }
}

impl std::fmt::Debug for OAuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthFlow").field("exchanger", &self.exchanger).finish()
    }
}
