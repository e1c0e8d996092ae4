#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{Value, json};
use shortlink::application::services::{AliasAllocator, AuthService, LinkService};
use shortlink::domain::click_event::ClickEvent;
use shortlink::infrastructure::persistence::{PgLinkRepository, PgUserRepository};
use shortlink::infrastructure::security::{Argon2PasswordHasher, JwtTokenIssuer};
use shortlink::routes::router;
use shortlink::state::AppState;
use shortlink::utils::code_generator::AliasGenerator;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const TEST_JWT_SECRET: &[u8] = b"test-jwt-secret";
pub const ADMIN_USERNAME: &str = "root";

pub async fn create_test_user(pool: &PgPool, username: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (username, password_hash) VALUES ($1, 'not-a-real-hash') RETURNING id",
    )
    .bind(username)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_link(pool: &PgPool, alias: &str, url: &str, owner_id: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (alias, original_url, owner_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(alias)
    .bind(url)
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn click_count(pool: &PgPool, alias: &str) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM links WHERE alias = $1")
        .bind(alias)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn link_service(pool: Arc<PgPool>) -> Arc<LinkService<PgLinkRepository>> {
    let link_repo = Arc::new(PgLinkRepository::new(pool));
    let allocator = AliasAllocator::new(link_repo.clone(), AliasGenerator::default(), 3);
    Arc::new(LinkService::new(
        link_repo,
        allocator,
        "https://s.example.com".to_string(),
    ))
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let pool = Arc::new(pool);
    let (tx, rx) = mpsc::channel(100);

    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(
        user_repo,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenIssuer::new(TEST_JWT_SECRET)),
        Duration::from_secs(3600),
    ));

    let state = AppState {
        pool: pool.clone(),
        link_service: link_service(pool),
        auth_service,
        click_sender: tx,
        admin_usernames: Arc::new(HashSet::from([ADMIN_USERNAME.to_string()])),
    };

    (state, rx)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

/// Registers `username` through the API and returns its bearer token.
pub async fn register(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/auth/register")
        .json(&json!({ "username": username, "password": "password123" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}
