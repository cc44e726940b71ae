//! Login endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::transport::HttpState;
use crate::error::AuthError;
use crate::oauth::TokenResponse;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "session_id";

// ─── Authorization Redirect ──────────────────────────────────────────────────

/// `GET /oauth/authorize`
///
/// Start a login and redirect the browser to the provider.
pub async fn handle_authorize(State(state): State<Arc<HttpState>>) -> Response {
    match state.flow.begin().await {
        Ok(url) => (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response(),
        Err(e) => e.into_response(),
    }
}

// ─── Callback ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /oauth/callback`
///
/// Exchange the authorization code and hand the token to the session store.
pub async fn handle_callback(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(ref flow_state) = query.state else {
        tracing::warn!("Callback without state parameter");
        return AuthError::StateNotFound.into_response();
    };

    let code = match (query.code.as_deref(), query.error.as_deref()) {
        (Some(code), None) => code,
        (_, error) => {
            tracing::debug!(error = ?error, "Callback without authorization code");
            return state
                .flow
                .abandon(flow_state, query.error_description.as_deref())
                .await
                .into_response();
        }
    };

    match state.flow.complete(code, flow_state).await {
        Ok(token) => {
            let summary = login_summary(&token);
            let session_id = state.sessions.persist(token).await;
            tracing::info!("Login completed");
            login_success(summary, &session_cookie(&session_id, state.secure_cookies))
        }
        Err(e) => e.into_response(),
    }
}

fn login_summary(token: &TokenResponse) -> serde_json::Value {
    serde_json::json!({
        "success": "Success",
        "token_type": token.token_type,
        "expires_in": token.expires_in,
        "scope": token.scope
    })
}

/// Build the success response with the session cookie and no-store cache headers.
///
/// A cookie that is not a valid header value fails the request rather than
/// reporting a login the browser cannot use.
fn login_success(summary: serde_json::Value, cookie: &str) -> Response {
    let cookie = match HeaderValue::from_str(cookie) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Session cookie is not a valid header value");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let mut response = Json(summary).into_response();

    let headers = response.headers_mut();
    headers.insert(header::SET_COOKIE, cookie);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

fn session_cookie(session_id: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

// ─── Error Responses ─────────────────────────────────────────────────────────

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::StateNotFound => StatusCode::BAD_REQUEST,
            Self::UpstreamApi { .. } => StatusCode::UNAUTHORIZED,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) | Self::Generation(_) | Self::ResponseDecode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if self.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Login request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Login request rejected");
        }

        (status, self.user_message()).into_response()
    }
}
