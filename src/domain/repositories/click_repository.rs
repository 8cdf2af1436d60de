//! Repository trait for click logging and analytics reads.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the append-only click log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click. Clicks are never updated or deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a click whose
    /// link was deleted while the event was queued.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Total number of clicks recorded for a link.
    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError>;

    /// Most recent clicks of a link, newest first.
    async fn recent_for_link(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, AppError>;
}
