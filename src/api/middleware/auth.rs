//! Bearer token authentication middleware.

use axum::{
    Extension,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::auth::AuthUser;
use crate::{error::AppError, state::AppState};

/// Reads the token from `Authorization`.
///
/// Accepts the standard `Bearer <token>` form and, for older clients, the
/// bare token with no scheme.
async fn extract_token(parts: &mut Parts) -> Option<String> {
    if let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(parts, &()).await {
        return Some(token);
    }

    let raw = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    if raw.is_empty() || raw.contains(' ') {
        return None;
    }

    Some(raw.to_string())
}

/// Authenticates requests using bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify signature and expiry
/// 3. Insert [`AuthUser`] into request extensions
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Token is malformed, forged, or expired
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/links", get(my_links_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = extract_token(&mut parts).await.ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Authorization header is missing or invalid"}),
        )
    })?;

    let user = st.auth_service.authenticate(&token)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Rejects callers whose username is not in `ADMIN_USERNAMES`.
///
/// Must run after [`layer`], which provides the [`AuthUser`].
pub async fn require_admin(
    State(st): State<AppState>,
    Extension(user): Extension<AuthUser>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !st.is_admin(&user.username) {
        tracing::warn!(user_id = user.user_id, "Non-admin tried the admin listing");
        return Err(AppError::forbidden(
            "Admin access required",
            json!({ "username": user.username }),
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn token_from(header_value: Option<&str>) -> Option<String> {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(v) = header_value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        extract_token(&mut parts).await
    }

    #[tokio::test]
    async fn test_bearer_scheme() {
        assert_eq!(token_from(Some("Bearer abc.def")).await.as_deref(), Some("abc.def"));
    }

    #[tokio::test]
    async fn test_bare_token() {
        assert_eq!(token_from(Some("abc.def")).await.as_deref(), Some("abc.def"));
    }

    #[tokio::test]
    async fn test_missing_or_foreign_scheme() {
        assert_eq!(token_from(None).await, None);
        assert_eq!(token_from(Some("")).await, None);
        assert_eq!(token_from(Some("Basic dXNlcjpwYXNz")).await, None);
    }
}
