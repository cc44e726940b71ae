//! Error types for the OAuth login flow.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

/// Message surfaced when the provider rejects a token request without a usable description.
pub const GENERIC_AUTHORIZATION_FAILURE: &str = "Authorization failed";

/// Errors from the authorization and token-exchange flow.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// A provider URI or HTTP client setting is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The secure randomness source could not produce a verifier.
    #[error("Failed to generate code verifier: {0}")]
    Generation(#[from] rand::Error),

    /// The state token is unknown, expired, or already consumed.
    #[error("Authorization state not found")]
    StateNotFound,

    /// The token endpoint could not be reached (DNS, connect, timeout, body read).
    #[error("Identity provider unreachable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// The provider answered the token request with an error status.
    #[error("{message}")]
    UpstreamApi {
        /// `error_description` from the provider, or the generic failure message
        message: String,
    },

    /// The provider returned a success status with an unreadable body.
    #[error("Failed to decode token response: {0}")]
    ResponseDecode(#[from] serde_json::Error),
}

impl AuthError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a provider API error.
    #[must_use]
    pub fn upstream_api(message: impl Into<String>) -> Self {
        Self::UpstreamApi { message: message.into() }
    }

    /// Returns true if the failure is on our side or the provider's, not the caller's.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::Generation(_)
                | Self::UpstreamUnavailable(_)
                | Self::ResponseDecode(_)
        )
    }

    /// Message that is safe to show to the end user.
    ///
    /// Only provider-supplied descriptions pass through; every other variant maps to a
    /// fixed string so the response cannot be used as a replay or timing oracle.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::StateNotFound => "Invalid or expired authorization request".to_string(),
            Self::UpstreamUnavailable(_) => "Identity provider unavailable".to_string(),
            Self::UpstreamApi { message } => message.clone(),
            Self::Configuration(_) | Self::Generation(_) | Self::ResponseDecode(_) => {
                "Internal Server Error".to_string()
            }
        }
    }
}

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
