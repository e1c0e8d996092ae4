//! Link entity representing a shortened URL owned by a user.

use chrono::{DateTime, Utc};

/// A shortened URL with its owner and click counter.
///
/// `alias` and `owner_id` never change after creation. The only mutation is
/// the click counter, which also advances `updated_at`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub alias: String,
    pub original_url: String,
    pub owner_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        alias: String,
        original_url: String,
        owner_id: i64,
        click_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            alias,
            original_url,
            owner_id,
            click_count,
            created_at,
            updated_at,
        }
    }

    /// Returns true if `user_id` created this link.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

/// Input data for inserting a link.
///
/// The alias is filled in by the allocator; the store assigns `id` and
/// timestamps and starts `click_count` at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub alias: String,
    pub original_url: String,
    pub owner_id: i64,
}
