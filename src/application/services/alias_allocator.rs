//! Alias allocation with collision retry.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::AliasGenerator;

/// Default number of random aliases tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Inserts links under a unique alias.
///
/// Uniqueness is decided by the store: the allocator inserts and treats
/// [`AppError::Conflict`] as "alias taken". It never checks for existence
/// first, so two concurrent requests for the same alias cannot both win.
///
/// # Custom aliases
///
/// Exactly one insert. A conflict is returned to the caller, who chose the
/// value and must pick another.
///
/// # Generated aliases
///
/// Up to `max_attempts` inserts, each with a freshly drawn alias. When every
/// attempt collides the result is [`AppError::AllocationExhausted`], which
/// signals load relative to the keyspace rather than a permanent failure.
/// Any other store error aborts immediately.
pub struct AliasAllocator<L: LinkRepository> {
    link_repository: Arc<L>,
    generator: AliasGenerator,
    max_attempts: usize,
}

impl<L: LinkRepository> AliasAllocator<L> {
    /// Creates an allocator.
    ///
    /// `max_attempts` is clamped to at least one.
    pub fn new(link_repository: Arc<L>, generator: AliasGenerator, max_attempts: usize) -> Self {
        Self {
            link_repository,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Stores `original_url` for `owner_id` under `custom_alias` or a
    /// generated alias.
    ///
    /// Inputs must already be validated.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] if the custom alias is taken
    /// - [`AppError::AllocationExhausted`] if every generated alias collided
    /// - [`AppError::Internal`] on database errors
    pub async fn allocate(
        &self,
        original_url: String,
        owner_id: i64,
        custom_alias: Option<String>,
    ) -> Result<Link, AppError> {
        match custom_alias {
            Some(alias) => self.allocate_custom(alias, original_url, owner_id).await,
            None => self.allocate_generated(original_url, owner_id).await,
        }
    }

    async fn allocate_custom(
        &self,
        alias: String,
        original_url: String,
        owner_id: i64,
    ) -> Result<Link, AppError> {
        let new_link = NewLink {
            alias: alias.clone(),
            original_url,
            owner_id,
        };

        self.link_repository
            .create(new_link)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => {
                    AppError::conflict("Alias already taken", json!({ "alias": alias }))
                }
                other => other,
            })
    }

    async fn allocate_generated(
        &self,
        original_url: String,
        owner_id: i64,
    ) -> Result<Link, AppError> {
        for attempt in 1..=self.max_attempts {
            let new_link = NewLink {
                alias: self.generator.generate(),
                original_url: original_url.clone(),
                owner_id,
            };
            let alias = new_link.alias.clone();

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(e) if e.is_conflict() => {
                    debug!(attempt, %alias, "Generated alias collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_attempts,
            keyspace = %self.generator.keyspace(),
            "Alias allocation exhausted"
        );

        Err(AppError::allocation_exhausted(
            "Failed to allocate a unique alias, try again later",
            json!({ "attempts": self.max_attempts, "reason": "Too many collisions" }),
        ))
    }
}
