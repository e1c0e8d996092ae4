//! Input validation for URLs, aliases, and credentials.
//!
//! Pure functions with no side effects. Each returns a typed error that
//! converts into [`AppError::Validation`] so services can use `?`.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use url::Url;

/// Maximum accepted length of an original URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Maximum length of a custom alias.
pub const MAX_ALIAS_LENGTH: usize = 16;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Aliases shadowed by fixed routes (`/health`, `/auth/*`, `/api/*`).
pub const RESERVED_ALIASES: &[&str] = &["health", "auth", "api"];

/// Host prefixes rejected as loopback or private.
///
/// This is a prefix match, not CIDR containment: `172.17.0.1` through
/// `172.31.255.255` are accepted even though they are private.
const PRIVATE_HOST_PREFIXES: &[&str] = &["127.", "192.168.", "10.", "172.16."];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("invalid URL format")]
    InvalidFormat,

    #[error("URL exceeds maximum length of 2048 characters")]
    TooLong,

    #[error("private IP addresses and localhost are not allowed")]
    PrivateAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AliasError {
    #[error("alias must not exceed 16 characters")]
    TooLong,

    #[error("alias must contain only alphanumeric characters, hyphens, and underscores")]
    InvalidChars,

    #[error("alias is reserved")]
    Reserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error(
        "username must be 3-64 characters and contain only alphanumeric characters, hyphens, and underscores"
    )]
    InvalidUsername,

    #[error("password must be at least 8 characters")]
    InvalidPassword,
}

impl From<UrlError> for AppError {
    fn from(e: UrlError) -> Self {
        let reason = match e {
            UrlError::InvalidFormat => "invalid_format",
            UrlError::TooLong => "too_long",
            UrlError::PrivateAddress => "private_address",
        };
        AppError::bad_request(e.to_string(), json!({ "field": "url", "reason": reason }))
    }
}

impl From<AliasError> for AppError {
    fn from(e: AliasError) -> Self {
        let reason = match e {
            AliasError::TooLong => "too_long",
            AliasError::InvalidChars => "invalid_chars",
            AliasError::Reserved => "reserved",
        };
        AppError::bad_request(e.to_string(), json!({ "field": "alias", "reason": reason }))
    }
}

impl From<CredentialsError> for AppError {
    fn from(e: CredentialsError) -> Self {
        let field = match e {
            CredentialsError::InvalidUsername => "username",
            CredentialsError::InvalidPassword => "password",
        };
        AppError::bad_request(e.to_string(), json!({ "field": field }))
    }
}

/// Characters allowed in aliases and usernames.
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Returns true if `c` may appear in an alias or username.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

pub fn is_reserved_alias(alias: &str) -> bool {
    RESERVED_ALIASES.contains(&alias)
}

/// Validates a URL submitted for shortening.
///
/// # Rules
///
/// - At most [`MAX_URL_LENGTH`] bytes
/// - Absolute URL with `http` or `https` scheme and a non-empty host
/// - Host must not contain `localhost` or start with a private prefix
///   (`127.`, `192.168.`, `10.`, `172.16.`)
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/page").is_ok());
/// assert_eq!(validate_url("ftp://example.com"), Err(UrlError::InvalidFormat));
/// assert_eq!(validate_url("http://10.0.0.1/"), Err(UrlError::PrivateAddress));
/// ```
pub fn validate_url(raw: &str) -> Result<(), UrlError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(UrlError::TooLong);
    }

    let url = Url::parse(raw).map_err(|_| UrlError::InvalidFormat)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::InvalidFormat);
    }

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h.to_ascii_lowercase(),
        _ => return Err(UrlError::InvalidFormat),
    };

    if host.contains("localhost")
        || PRIVATE_HOST_PREFIXES
            .iter()
            .any(|prefix| host.starts_with(prefix))
    {
        return Err(UrlError::PrivateAddress);
    }

    Ok(())
}

/// Validates a caller-supplied alias.
///
/// An empty alias is valid and means "generate one".
pub fn validate_alias(alias: &str) -> Result<(), AliasError> {
    if alias.is_empty() {
        return Ok(());
    }

    if alias.len() > MAX_ALIAS_LENGTH {
        return Err(AliasError::TooLong);
    }

    if !IDENTIFIER_REGEX.is_match(alias) {
        return Err(AliasError::InvalidChars);
    }

    if is_reserved_alias(alias) {
        return Err(AliasError::Reserved);
    }

    Ok(())
}

/// Validates a username and returns it with surrounding whitespace removed.
pub fn validate_username(username: &str) -> Result<&str, CredentialsError> {
    let trimmed = username.trim();

    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&trimmed.len()) {
        return Err(CredentialsError::InvalidUsername);
    }

    if !IDENTIFIER_REGEX.is_match(trimmed) {
        return Err(CredentialsError::InvalidUsername);
    }

    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<(), CredentialsError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CredentialsError::InvalidPassword);
    }
    Ok(())
}
