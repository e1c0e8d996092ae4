//! Shared application state injected into every handler.

use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, LinkService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::persistence::{PgLinkRepository, PgUserRepository};

pub type AppLinkService = LinkService<PgLinkRepository>;
pub type AppAuthService = AuthService<PgUserRepository>;

/// Cheap to clone: every field is an `Arc` or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub link_service: Arc<AppLinkService>,
    pub auth_service: Arc<AppAuthService>,
    /// Redirects enqueue clicks here; see [`crate::application::click_worker`].
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub admin_usernames: Arc<HashSet<String>>,
}

impl AppState {
    pub fn is_admin(&self, username: &str) -> bool {
        self.admin_usernames.contains(username)
    }
}
