//! Account registration, login, and bearer token authentication.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::OnceCell;

use crate::domain::auth::{AuthUser, PasswordHasher, TokenError, TokenIssuer};
use crate::domain::entities::NewUser;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::validation::{validate_password, validate_username};

/// Result of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

/// Service for user accounts and bearer tokens.
///
/// Password hashing and token signing are injected as trait objects so the
/// service does not depend on a particular algorithm.
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    token_ttl: Duration,
    /// Checked against on unknown usernames so both login failures cost
    /// one password verification.
    dummy_hash: OnceCell<String>,
}

const DUMMY_PASSWORD: &str = "shortlink-dummy-password";

fn invalid_credentials() -> AppError {
    AppError::unauthorized(
        "Invalid username or password",
        json!({ "reason": "invalid_credentials" }),
    )
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            token_ttl,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Creates an account and returns a session for it.
    ///
    /// The username is stored trimmed.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the username or password is malformed
    /// - [`AppError::Conflict`] if the username is taken
    /// - [`AppError::Internal`] on hashing, signing, or database errors
    pub async fn register(&self, username: &str, password: &str) -> Result<AuthSession, AppError> {
        let username = validate_username(username)?;
        validate_password(password)?;

        let password_hash = self.hash_password(password).await?;

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => AppError::conflict(
                    "Username already taken",
                    json!({ "username": username }),
                ),
                other => other,
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        self.session_for(user.id, user.username)
    }

    /// Verifies credentials and returns a fresh session.
    ///
    /// Unknown usernames and wrong passwords produce the same error and both
    /// run a password verification.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] on bad credentials
    /// - [`AppError::Internal`] on hashing, signing, or database errors
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AppError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            tracing::debug!("Login for unknown username");
            self.verify_against_dummy(password).await;
            return Err(invalid_credentials());
        };

        if !self.verify_password(user.password_hash, password).await? {
            tracing::debug!(user_id = user.id, "Login with wrong password");
            return Err(invalid_credentials());
        }

        self.session_for(user.id, user.username)
    }

    /// Resolves a bearer token to the identity it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with reason `token expired` or
    /// `invalid token`.
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        self.tokens.verify(token).map_err(|e| {
            AppError::unauthorized("Unauthorized", json!({ "reason": e.to_string() }))
        })
    }

    fn session_for(&self, user_id: i64, username: String) -> Result<AuthSession, AppError> {
        let token = self
            .tokens
            .issue(user_id, &username, self.token_ttl)
            .map_err(|e: TokenError| {
                tracing::error!(error = %e, "Token signing failed");
                AppError::internal("Failed to issue token", json!({}))
            })?;

        Ok(AuthSession {
            user_id,
            username,
            token,
        })
    }

    // Argon2 is deliberately slow; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                AppError::internal(
                    "Password hashing task failed",
                    json!({ "error": e.to_string() }),
                )
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AppError::internal("Failed to hash password", json!({}))
            })
    }

    async fn verify_password(&self, hash: String, password: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| {
                AppError::internal(
                    "Password check task failed",
                    json!({ "error": e.to_string() }),
                )
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Stored password hash is unreadable");
                AppError::internal("Failed to verify password", json!({}))
            })
    }

    async fn verify_against_dummy(&self, password: &str) {
        let hash = match self
            .dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await
        {
            Ok(hash) => hash.clone(),
            Err(_) => return,
        };

        let _ = self.verify_password(hash, password).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{MockPasswordHasher, MockTokenIssuer};
    use crate::domain::entities::User;
    use crate::domain::repositories::MockUserRepository;
    use chrono::Utc;
    use std::sync::Mutex;

    const TTL: Duration = Duration::from_secs(3600);

    fn user(id: i64, username: &str, password_hash: &str) -> User {
        let now = Utc::now();
        User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Hasher that prefixes the plaintext, so verification is predictable.
    fn fake_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|p| Ok(format!("hashed:{p}")));
        hasher
            .expect_verify()
            .returning(|h, p| Ok(h == format!("hashed:{p}")));
        hasher
    }

    fn fake_tokens() -> MockTokenIssuer {
        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue()
            .returning(|id, name, _| Ok(format!("token-{id}-{name}")));
        tokens.expect_verify().returning(|t| match t {
            "token-1-alice" => Ok(AuthUser {
                user_id: 1,
                username: "alice".into(),
            }),
            "expired" => Err(TokenError::Expired),
            _ => Err(TokenError::Invalid),
        });
        tokens
    }

    fn service(users: MockUserRepository) -> AuthService<MockUserRepository> {
        AuthService::new(
            Arc::new(users),
            Arc::new(fake_hasher()),
            Arc::new(fake_tokens()),
            TTL,
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|u| u.username == "alice" && u.password_hash == "hashed:password1")
            .times(1)
            .returning(|u| Ok(user(1, &u.username, &u.password_hash)));

        let session = service(users)
            .register("  alice ", "password1")
            .await
            .unwrap();

        assert_eq!(session.user_id, 1);
        assert_eq!(session.username, "alice");
        assert_eq!(session.token, "token-1-alice");
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let registered = Arc::new(Mutex::new(Vec::<String>::new()));
        let registered_in_mock = registered.clone();

        let mut users = MockUserRepository::new();
        users.expect_create().times(2).returning(move |u| {
            let mut names = registered_in_mock.lock().unwrap();
            if names.contains(&u.username) {
                return Err(AppError::conflict("Unique constraint violation", json!({})));
            }
            names.push(u.username.clone());
            Ok(user(names.len() as i64, &u.username, &u.password_hash))
        });

        let service = service(users);
        assert!(service.register("alice", "password1").await.is_ok());

        let err = service.register("alice", "password2").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), "Username already taken");
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_before_storage() {
        let mut users = MockUserRepository::new();
        users.expect_create().times(0);

        let err = service(users).register("alice", "short").await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_username() {
        let mut users = MockUserRepository::new();
        users.expect_create().times(0);

        let err = service(users)
            .register("a b", "password1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_hash_failure_is_internal() {
        let mut users = MockUserRepository::new();
        users.expect_create().times(0);

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(anyhow::anyhow!("out of memory")));

        let service = AuthService::new(
            Arc::new(users),
            Arc::new(hasher),
            Arc::new(fake_tokens()),
            TTL,
        );
        let err = service.register("alice", "password1").await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .withf(|name| name == "alice")
            .returning(|name| Ok(Some(user(1, name, "hashed:password1"))));

        let session = service(users).login("alice", "password1").await.unwrap();

        assert_eq!(session.user_id, 1);
        assert_eq!(session.token, "token-1-alice");
    }

    #[tokio::test]
    async fn test_login_unknown_user_and_wrong_password_are_identical() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|name| match name {
                "alice" => Ok(Some(user(1, name, "hashed:password1"))),
                _ => Ok(None),
            });

        let service = service(users);
        let unknown = service.login("mallory", "password1").await.unwrap_err();
        let wrong = service.login("alice", "wrong-password").await.unwrap_err();

        assert!(matches!(unknown, AppError::Unauthorized { .. }));
        assert_eq!(unknown.to_error_info().code, wrong.to_error_info().code);
        assert_eq!(unknown.to_error_info().message, wrong.to_error_info().message);
        assert_eq!(unknown.to_error_info().details, wrong.to_error_info().details);
    }

    #[tokio::test]
    async fn test_login_unknown_user_still_verifies_a_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|p| Ok(format!("hashed:{p}")));
        hasher
            .expect_verify()
            .withf(|h, _| h == format!("hashed:{DUMMY_PASSWORD}"))
            .times(2)
            .returning(|_, _| Ok(false));

        let service = AuthService::new(
            Arc::new(users),
            Arc::new(hasher),
            Arc::new(fake_tokens()),
            TTL,
        );

        for name in ["mallory", "trudy"] {
            let err = service.login(name, "password1").await.unwrap_err();
            assert!(matches!(err, AppError::Unauthorized { .. }));
        }
    }

    #[tokio::test]
    async fn test_login_storage_error_is_internal() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let err = service(users).login("alice", "password1").await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[test]
    fn test_authenticate_valid_token() {
        let service = service(MockUserRepository::new());

        let user = service.authenticate("token-1-alice").unwrap();

        assert_eq!(user.user_id, 1);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_authenticate_distinguishes_expired_from_invalid() {
        let service = service(MockUserRepository::new());

        let expired = service.authenticate("expired").unwrap_err();
        let invalid = service.authenticate("garbage").unwrap_err();

        assert!(matches!(expired, AppError::Unauthorized { .. }));
        assert!(matches!(invalid, AppError::Unauthorized { .. }));
        assert_eq!(expired.to_error_info().details["reason"], "token expired");
        assert_eq!(invalid.to_error_info().details["reason"], "invalid token");
    }
}
