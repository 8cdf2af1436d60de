//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkFilter, LinkSummary, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken. This is the
    /// store-level uniqueness check and is distinguishable from other failures.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its surrogate id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Finds a link by its slug.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Read-only existence check used by the slug allocator.
    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError>;

    /// Lists links newest first with click aggregates.
    async fn list(&self, filter: LinkFilter) -> Result<Vec<LinkSummary>, AppError>;

    /// Counts links matching the optional search term.
    async fn count(&self, search: Option<String>) -> Result<i64, AppError>;

    /// Replaces the destination of a link.
    ///
    /// Returns `Ok(None)` if no link has the given id.
    async fn update_destination(
        &self,
        id: i64,
        destination: String,
    ) -> Result<Option<Link>, AppError>;

    /// Deletes a link; its clicks are removed by cascade.
    ///
    /// Returns `Ok(true)` if a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
