//! HS256 JSON Web Tokens.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::auth::{AuthUser, TokenError, TokenIssuer};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// [`TokenIssuer`] signing HS256 tokens with a shared secret.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: i64, username: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Issue(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthUser, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Invalid)?;

        Ok(AuthUser {
            user_id,
            username: data.claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-jwt-secret";

    #[test]
    fn test_issue_then_verify() {
        let issuer = JwtTokenIssuer::new(SECRET);
        let token = issuer.issue(42, "alice", Duration::from_secs(60)).unwrap();

        let user = issuer.verify(&token).unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_expired_token() {
        let issuer = JwtTokenIssuer::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".into(),
            username: "alice".into(),
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = JwtTokenIssuer::new(b"other-secret")
            .issue(1, "alice", Duration::from_secs(60))
            .unwrap();

        assert_eq!(
            JwtTokenIssuer::new(SECRET).verify(&token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        let issuer = JwtTokenIssuer::new(SECRET);

        assert_eq!(issuer.verify("not.a.jwt"), Err(TokenError::Invalid));
        assert_eq!(issuer.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let issuer = JwtTokenIssuer::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".into(),
            username: "alice".into(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(issuer.verify(&token), Err(TokenError::Invalid));
    }
}
