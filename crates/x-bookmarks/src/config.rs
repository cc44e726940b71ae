//! Configuration for the OAuth login service.

use std::time::Duration;

use anyhow::Context;

/// Default provider settings (X API v2).
pub mod defaults {
    use std::time::Duration;

    /// Provider authorization endpoint.
    pub const AUTHORIZATION_URI: &str = "https://twitter.com/i/oauth2/authorize";

    /// Provider token endpoint.
    pub const TOKEN_URI: &str = "https://api.twitter.com/2/oauth2/token";

    /// Scopes needed to read the signed-in user's bookmarks.
    pub const SCOPE: &str = "tweet.read users.read bookmark.read offline.access";

    /// Total timeout for the token request.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection timeout for the token request.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// How long a started login may wait for its callback (10 minutes).
    pub const FLOW_TTL: Duration = Duration::from_secs(600);

    /// Cap on pending login flows held in memory; the oldest is evicted when full.
    pub const MAX_PENDING_FLOWS: usize = 10_000;

    /// Sweep interval for expired flows and sessions.
    pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

    /// Lifetime of a stored session when the provider omits `expires_in`.
    pub const SESSION_LIFETIME: Duration = Duration::from_secs(24 * 3600);
}

/// Service configuration.
///
/// Built once at startup and shared read-only with every component.
#[derive(Clone)]
pub struct Config {
    /// OAuth client identifier.
    pub client_id: String,

    /// OAuth client secret (empty for public clients).
    pub client_secret: String,

    /// Callback URL registered with the provider.
    pub redirect_uri: String,

    /// Provider authorization endpoint.
    pub authorization_uri: String,

    /// Provider token endpoint.
    pub token_uri: String,

    /// Space separated scope list.
    pub scope: String,

    /// Token request timeout.
    pub request_timeout: Duration,

    /// Token request connection timeout.
    pub connect_timeout: Duration,

    /// Lifetime of a pending login flow.
    pub flow_ttl: Duration,

    /// Maximum number of pending login flows.
    pub max_pending_flows: usize,

    /// Background sweep interval.
    pub cleanup_interval: Duration,

    /// Session lifetime when the token has no `expires_in`.
    pub session_lifetime: Duration,

    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl Config {
    /// Create a configuration for the given client with default provider endpoints.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            authorization_uri: defaults::AUTHORIZATION_URI.to_string(),
            token_uri: defaults::TOKEN_URI.to_string(),
            scope: defaults::SCOPE.to_string(),
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
            flow_ttl: defaults::FLOW_TTL,
            max_pending_flows: defaults::MAX_PENDING_FLOWS,
            cleanup_interval: defaults::CLEANUP_INTERVAL,
            session_lifetime: defaults::SESSION_LIFETIME,
            secure_cookies: false,
        }
    }

    /// Create a test configuration pointing at a mock provider.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            authorization_uri: format!("{}/i/oauth2/authorize", base_url),
            token_uri: format!("{}/2/oauth2/token", base_url),
            scope: "tweet.read users.read bookmark.read".to_string(),
            request_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            ..Self::new("test-client", "test-secret", "http://localhost:8080/oauth/callback")
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `CLIENT_ID` and `REDIRECT_URI` are required; everything else falls back to
    /// [`defaults`].
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or a number fails to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = required("CLIENT_ID")?;
        let redirect_uri = required("REDIRECT_URI")?;
        let client_secret = std::env::var("CLIENT_SECRET").unwrap_or_default();

        let mut config = Self::new(client_id, client_secret, redirect_uri);

        if let Ok(uri) = std::env::var("AUTHORIZATION_URI") {
            config.authorization_uri = uri;
        }
        if let Ok(uri) = std::env::var("TOKEN_URI") {
            config.token_uri = uri;
        }
        if let Ok(scope) = std::env::var("SCOPE") {
            config.scope = scope;
        }
        if let Some(secs) = seconds("FLOW_TTL_SECS")? {
            config.flow_ttl = secs;
        }
        if let Some(secs) = seconds("TOKEN_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = secs;
        }
        if let Ok(raw) = std::env::var("MAX_PENDING_FLOWS") {
            config.max_pending_flows =
                raw.parse::<usize>().context("MAX_PENDING_FLOWS must be a whole number")?;
        }

        Ok(config)
    }

    /// Check if a client secret is configured.
    #[must_use]
    pub fn has_client_secret(&self) -> bool {
        !self.client_secret.is_empty()
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} is not set"))?;
    anyhow::ensure!(!value.trim().is_empty(), "{name} is empty");
    Ok(value)
}

fn seconds(name: &str) -> anyhow::Result<Option<Duration>> {
    std::env::var(name)
        .ok()
        .map(|raw| {
            raw.parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("{name} must be a whole number of seconds"))
        })
        .transpose()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("has_client_secret", &self.has_client_secret())
            .field("redirect_uri", &self.redirect_uri)
            .field("authorization_uri", &self.authorization_uri)
            .field("token_uri", &self.token_uri)
            .field("scope", &self.scope)
            .field("flow_ttl", &self.flow_ttl)
            .field("max_pending_flows", &self.max_pending_flows)
            .finish()
    }
}
