//! Link creation, resolution, click counting, and owner-scoped access.

use std::sync::Arc;

use crate::application::services::alias_allocator::AliasAllocator;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::validation::{validate_alias, validate_url};
use serde_json::json;

/// Page size used when the caller gives none or a non-positive one.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Largest page size a caller can request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamps a requested page size into `1..=MAX_PAGE_LIMIT`.
///
/// Missing or non-positive values fall back to [`DEFAULT_PAGE_LIMIT`].
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_LIMIT),
        _ => DEFAULT_PAGE_LIMIT,
    }
}

/// Service for creating and reading shortened links.
///
/// Validation happens here; alias uniqueness is delegated to
/// [`AliasAllocator`] and ultimately to the store.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    allocator: AliasAllocator<L>,
    base_url: String,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin used to build short URLs.
    pub fn new(link_repository: Arc<L>, allocator: AliasAllocator<L>, base_url: String) -> Self {
        Self {
            link_repository,
            allocator,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link owned by `owner_id`.
    ///
    /// The URL is validated first, then the alias. An empty alias is treated
    /// the same as no alias and gets a generated one.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL or alias is malformed
    /// - [`AppError::Conflict`] if the custom alias is taken
    /// - [`AppError::AllocationExhausted`] if generated aliases kept colliding
    /// - [`AppError::Internal`] on database errors
    pub async fn create_link(
        &self,
        original_url: String,
        alias: Option<String>,
        owner_id: i64,
    ) -> Result<Link, AppError> {
        validate_url(&original_url)?;

        let alias = alias.filter(|a| !a.is_empty());
        if let Some(ref a) = alias {
            validate_alias(a)?;
        }

        let link = self.allocator.allocate(original_url, owner_id, alias).await?;

        tracing::info!(alias = %link.alias, owner_id, "Link created");

        Ok(link)
    }

    /// Looks up a link by alias. No side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this alias.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, alias: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_alias(alias)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "alias": alias })))
    }

    /// Counts one click on `alias`.
    ///
    /// Issues a single atomic increment in the store; the current count is
    /// never read back, so concurrent clicks cannot overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this alias.
    /// Returns [`AppError::Unavailable`] if no connection could be acquired.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn record_click(&self, alias: &str) -> Result<(), AppError> {
        if self.link_repository.increment_clicks(alias).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Short link not found",
                json!({ "alias": alias }),
            ))
        }
    }

    /// Returns the link only if `requester_id` owns it.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link has this alias
    /// - [`AppError::Forbidden`] if the link belongs to another user
    /// - [`AppError::Internal`] on database errors
    pub async fn get_owned_link(&self, alias: &str, requester_id: i64) -> Result<Link, AppError> {
        let link = self.resolve(alias).await?;

        if !link.is_owned_by(requester_id) {
            return Err(AppError::forbidden(
                "You don't have permission to view this link",
                json!({ "alias": alias }),
            ));
        }

        Ok(link)
    }

    /// Lists every link, newest first. Ownership is not checked here; callers
    /// gate this behind the admin capability.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_all(&self, limit: Option<i64>, offset: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository
            .list(clamp_limit(limit), offset)
            .await
    }

    /// Lists links created by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        self.link_repository
            .list_by_owner(owner_id, clamp_limit(limit), offset)
            .await
    }

    /// Builds the public short URL for an alias.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.base_url, alias)
    }
}
