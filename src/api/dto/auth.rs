//! DTOs for registration and login.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::AuthSession;

/// Body of `POST /auth/register` and `POST /auth/login`.
///
/// Length rules are enforced on registration only.
#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, max = 256, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 1024, message = "Password is required"))]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Session returned after registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: i64,
    pub username: String,
    pub token: String,
    pub token_type: &'static str,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user_id: session.user_id,
            username: session.username,
            token: session.token,
            token_type: "Bearer",
        }
    }
}
