//! API route configuration.
//!
//! Every route here sits behind [`crate::api::middleware::auth::layer`];
//! the admin subtree additionally behind
//! [`crate::api::middleware::auth::require_admin`].

use crate::api::handlers::{
    admin_list_links_handler, create_link_handler, get_link_handler, login_handler,
    my_links_handler, register_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Account routes, no authentication.
///
/// # Endpoints
///
/// - `POST /register` - Create an account
/// - `POST /login`    - Exchange credentials for a token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}

/// Link routes for the authenticated caller.
///
/// # Endpoints
///
/// - `POST /links`          - Create a link
/// - `GET  /links`          - List own links
/// - `GET  /links/{alias}`  - Own link detail
/// - `GET  /admin/links`    - All links (admin only)
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/links", get(admin_list_links_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/links", post(create_link_handler).get(my_links_handler))
        .route("/links/{alias}", get(get_link_handler))
        .nest("/admin", admin)
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
