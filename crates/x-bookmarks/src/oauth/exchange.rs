//! Authorization code exchange against the provider's token endpoint.
//!
//! The exchange is never retried: authorization codes are single-use, and the
//! verifier has already been consumed from the flow store by the time the request
//! is sent. If the caller drops the future, the in-flight request is cancelled and
//! the verifier is discarded with it.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use super::store::FlowStateStore;
use super::types::TokenResponse;
use crate::config::Config;
use crate::error::{AuthError, AuthResult, GENERIC_AUTHORIZATION_FAILURE};

/// Largest token endpoint response body that is read (64 KiB).
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Exchanges authorization codes for access tokens.
#[derive(Clone)]
pub struct TokenExchanger {
    client: Client,
    token_uri: Url,
    config: Arc<Config>,
    store: Arc<dyn FlowStateStore>,
}

impl TokenExchanger {
    /// Create an exchanger for the configured token endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token URI is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: Arc<Config>, store: Arc<dyn FlowStateStore>) -> AuthResult<Self> {
        let token_uri = Url::parse(&config.token_uri)
            .map_err(|e| AuthError::configuration(format!("invalid token URI: {e}")))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AuthError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, token_uri, config, store })
    }

    /// Exchange an authorization code for a token, consuming the flow for `state`.
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        state: &str,
    ) -> AuthResult<TokenResponse> {
        let Some(code_verifier) = self.store.find_and_delete(state).await else {
            tracing::warn!("No pending login for callback state");
            return Err(AuthError::StateNotFound);
        };

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "authorization_code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("code", code)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("code_verifier", &code_verifier)
            .finish();

        let response = self
            .client
            .post(self.token_uri.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(
                AUTHORIZATION,
                basic_credentials(&self.config.client_id, &self.config.client_secret),
            )
            .body(body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Token request failed to reach provider"))?;

        let status = response.status();
        let Some(bytes) = read_capped(response, MAX_RESPONSE_BYTES).await? else {
            tracing::warn!(
                status = status.as_u16(),
                limit = MAX_RESPONSE_BYTES,
                "Token endpoint response exceeds size limit"
            );
            return Err(if status.is_success() {
                AuthError::ResponseDecode(serde::de::Error::custom("token response too large"))
            } else {
                AuthError::upstream_api(GENERIC_AUTHORIZATION_FAILURE)
            });
        };

        if !status.is_success() {
            let message = classify_error_body(&bytes);
            tracing::warn!(status = status.as_u16(), error = %message, "Provider rejected token request");
            return Err(AuthError::upstream_api(message));
        }

        let token: TokenResponse = serde_json::from_slice(&bytes).inspect_err(|e| {
            tracing::error!(status = status.as_u16(), error = %e, "Malformed token response");
        })?;

        tracing::info!(
            token_type = %token.token_type,
            expires_in = ?token.expires_in,
            "Exchanged authorization code for access token"
        );

        Ok(token)
    }
}

impl std::fmt::Debug for TokenExchanger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenExchanger").field("token_uri", &self.token_uri.as_str()).finish()
    }
}

/// Read a response body, giving up once it grows past `limit` bytes.
///
/// Returns `None` if the body is larger than `limit`.
async fn read_capped(mut response: Response, limit: usize) -> reqwest::Result<Option<Vec<u8>>> {
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Ok(None);
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Some(body))
}

/// Extract a user-facing message from a token endpoint error body.
///
/// Returns the string `error_description` when the body is a JSON object carrying
/// one, and the generic failure message otherwise.
pub fn classify_error_body(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error_description")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| GENERIC_AUTHORIZATION_FAILURE.to_string())
}

/// `Basic` authorization header value for client credentials.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{client_id}:{client_secret}")))
}
