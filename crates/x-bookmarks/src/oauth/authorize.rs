//! Authorization request construction.

use url::Url;

use crate::error::{AuthError, AuthResult};

/// Generate an opaque state token from two UUIDs (244 random bits).
pub fn generate_state() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

/// Build the provider authorization URL for an Authorization Code + PKCE request.
///
/// Query parameters already present on `base_uri` are kept.
pub fn build_authorization_url(
    base_uri: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
    code_challenge: &str,
) -> AuthResult<Url> {
    let mut url = Url::parse(base_uri)
        .map_err(|e| AuthError::configuration(format!("invalid authorization URI: {e}")))?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", scope)
        .append_pair("state", state)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256");

    Ok(url)
}
