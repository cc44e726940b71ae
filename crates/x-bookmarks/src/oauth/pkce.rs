//! PKCE (Proof Key for Code Exchange) generation and verification.
//!
//! Implements the S256 method per RFC 7636.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::AuthResult;

/// Length of a generated code verifier.
pub const VERIFIER_LENGTH: usize = 64;

/// RFC 7636 unreserved characters.
const UNRESERVED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Generate a code verifier from the operating system's CSPRNG.
pub fn generate_verifier() -> AuthResult<String> {
    generate_verifier_from(&mut OsRng)
}

/// Generate a code verifier from the given randomness source.
///
/// Each random byte is mapped into the unreserved set by modulo.
pub fn generate_verifier_from<R: RngCore + ?Sized>(rng: &mut R) -> AuthResult<String> {
    let mut bytes = [0u8; VERIFIER_LENGTH];
    rng.try_fill_bytes(&mut bytes)?;

    Ok(bytes.iter().map(|b| char::from(UNRESERVED[usize::from(*b) % UNRESERVED.len()])).collect())
}

/// Compute the S256 code challenge: `BASE64URL(SHA256(code_verifier))`.
pub fn generate_challenge(code_verifier: &str) -> String {
    let hash = Sha256::digest(code_verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Verify a PKCE S256 code challenge.
pub fn verify_s256(code_verifier: &str, code_challenge: &str) -> bool {
    generate_challenge(code_verifier) == code_challenge
}
