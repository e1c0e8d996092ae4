//! Handlers for link creation and owner-scoped reads.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::api::dto::pagination::ListParams;
use crate::domain::auth::AuthUser;
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

fn to_response(state: &AppState, link: Link) -> LinkResponse {
    let short_url = state.link_service.short_url(&link.alias);
    LinkResponse::from_link(link, short_url)
}

fn to_list(state: &AppState, links: Vec<Link>, params: &ListParams) -> LinkListResponse {
    LinkListResponse {
        items: links.into_iter().map(|l| to_response(state, l)).collect(),
        limit: params.effective_limit(),
        offset: params.offset(),
    }
}

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/landing", "alias": "sale" }
/// ```
///
/// `alias` is optional; when omitted a random one is generated.
///
/// # Errors
///
/// - 400 for a malformed or private URL or a bad alias
/// - 409 if the custom alias is taken
/// - 503 if random aliases kept colliding
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.url, payload.alias, user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Returns one of the caller's links, including its click count.
///
/// # Endpoint
///
/// `GET /api/links/{alias}`
///
/// # Errors
///
/// - 403 if the link belongs to someone else
/// - 404 if no link has this alias
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(alias): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .get_owned_link(&alias, user.user_id)
        .await?;

    Ok(Json(to_response(&state, link)))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?limit=50&offset=0`
pub async fn my_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state
        .link_service
        .list_by_owner(user.user_id, params.limit, params.offset())
        .await?;

    Ok(Json(to_list(&state, links, &params)))
}

/// Lists every link regardless of owner.
///
/// # Endpoint
///
/// `GET /api/admin/links?limit=50&offset=0`
///
/// Guarded by [`crate::api::middleware::auth::require_admin`].
pub async fn admin_list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state
        .link_service
        .list_all(params.limit, params.offset())
        .await?;

    Ok(Json(to_list(&state, links, &params)))
}
