//! Authentication capabilities consumed by the auth service.
//!
//! Both traits are object-safe so services hold them as `Arc<dyn ...>` and
//! tests can substitute fakes.

use std::time::Duration;

/// Identity extracted from a verified token.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    /// Signing failed. Only produced by [`TokenIssuer::issue`].
    #[error("failed to issue token: {0}")]
    Issue(String),
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produces a self-describing hash (salt included) for `plaintext`.
    fn hash(&self, plaintext: &str) -> anyhow::Result<String>;

    /// Returns true if `plaintext` matches `hash`.
    ///
    /// A malformed hash is an error, not a mismatch.
    fn verify(&self, hash: &str, plaintext: &str) -> anyhow::Result<bool>;
}

/// Signed, expiring bearer tokens.
///
/// Expiry is enforced by [`TokenIssuer::verify`], never by callers.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: i64, username: &str, ttl: Duration) -> Result<String, TokenError>;

    fn verify(&self, token: &str) -> Result<AuthUser, TokenError>;
}
