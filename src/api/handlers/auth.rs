//! Handlers for account registration and login.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{AuthResponse, CredentialsRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account and returns a bearer token for it.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "correct horse" }
/// ```
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// { "user_id": 1, "username": "alice", "token": "eyJ...", "token_type": "Bearer" }
/// ```
///
/// # Errors
///
/// - 400 if the username or password breaks the policy
/// - 409 if the username is taken
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .register(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Exchanges credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns 401 with the same body for an unknown user and a wrong password.
/// Credentials are not shape-checked here; anything that cannot match an
/// account is simply invalid.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    tracing::info!(user_id = session.user_id, "User logged in");

    Ok(Json(session.into()))
}
