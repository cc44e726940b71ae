//! X Bookmarks login service
//!
//! Signs a user in to X with the OAuth 2.0 Authorization Code grant and PKCE, then
//! keeps the resulting access token in a server-side session for the bookmark
//! pages to use.
//!
//! # Features
//!
//! - **PKCE (S256)**: 64-character verifiers from the OS CSPRNG
//! - **Single-use state**: verifiers are taken atomically; replayed callbacks fail
//! - **Bounded exchange**: the token request has a hard timeout and is never retried
//! - **Safe errors**: provider descriptions pass through, everything else is generic
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use x_bookmarks::{config::Config, oauth::{MemoryFlowStore, OAuthFlow}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(Config::from_env()?);
//!     let flow = OAuthFlow::new(config, Arc::new(MemoryFlowStore::new()))?;
//!
//!     let url = flow.begin().await?;
//!     println!("Sign in at {url}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod oauth;
pub mod server;

pub use config::Config;
pub use error::{AuthError, AuthResult};
pub use oauth::{OAuthFlow, TokenResponse};
pub use server::AuthServer;
