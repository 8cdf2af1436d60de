//! Link creation, listing, update and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::application::services::slug_allocator::{SlugAllocator, SlugOrigin};
use crate::domain::entities::{Caller, Link, LinkFilter, LinkSummary, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::destination::validate_destination;

/// Inserts attempted for generated slugs that lose a race at commit time.
const MAX_COMMIT_ATTEMPTS: usize = 3;

/// A page of link summaries plus the total match count.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub items: Vec<LinkSummary>,
    pub total: i64,
}

/// Service for managing short links on behalf of authenticated callers.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    allocator: SlugAllocator,
    public_base_url: String,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `public_base_url` prefixes slugs in [`Self::short_url`].
    pub fn new(
        link_repository: Arc<L>,
        allocator: SlugAllocator,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            allocator,
            public_base_url: public_base_url.into(),
        }
    }

    /// Creates a short link owned by `caller`.
    ///
    /// Validation of the destination and of `custom_slug` happens before any
    /// write. A generated slug that loses a race against a concurrent insert is
    /// re-allocated; a custom slug in the same situation is a conflict.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - invalid destination or custom slug
    /// - [`AppError::Conflict`] - custom slug already taken
    /// - [`AppError::Exhausted`] - no free slug found
    pub async fn create_link(
        &self,
        caller: &Caller,
        destination: &str,
        custom_slug: Option<&str>,
    ) -> Result<Link, AppError> {
        let destination = parse_destination(destination)?;
        let custom_slug = custom_slug.filter(|s| !s.is_empty());

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let slug = self
                .allocator
                .allocate(self.link_repository.as_ref(), custom_slug)
                .await?;

            let new_link = NewLink {
                slug: slug.value.clone(),
                destination: destination.clone(),
                owner: caller.owner.clone(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    info!(link_id = link.id, slug = %link.slug, owner = %link.owner, "Link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) if slug.origin == SlugOrigin::Generated => {
                    warn!(attempt, slug = %slug.value, "Slug taken at commit, re-allocating");
                }
                Err(AppError::Conflict { .. }) => {
                    return Err(AppError::conflict(
                        "Slug already exists",
                        json!({ "slug": slug.value }),
                    ));
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::exhausted(
            "Failed to generate unique slug",
            json!({ "commit_attempts": MAX_COMMIT_ATTEMPTS }),
        ))
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: i64) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Lists links (all owners, newest first) with click aggregates.
    pub async fn list_links(&self, filter: LinkFilter) -> Result<LinkPage, AppError> {
        let total = self.link_repository.count(filter.search.clone()).await?;
        let items = self.link_repository.list(filter).await?;

        Ok(LinkPage { items, total })
    }

    /// Replaces the destination of a link the caller may manage.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - invalid destination
    /// - [`AppError::NotFound`] - unknown id
    /// - [`AppError::Forbidden`] - caller is neither owner nor admin
    pub async fn update_destination(
        &self,
        caller: &Caller,
        id: i64,
        destination: &str,
    ) -> Result<Link, AppError> {
        let destination = parse_destination(destination)?;
        let link = self.get_link(id).await?;
        ensure_can_manage(caller, &link, "edit")?;

        let updated = self
            .link_repository
            .update_destination(id, destination)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        info!(link_id = id, owner = %caller.owner, "Link destination updated");
        Ok(updated)
    }

    /// Deletes a link the caller may manage, together with its clicks.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown id
    /// - [`AppError::Forbidden`] - caller is neither owner nor admin
    pub async fn delete_link(&self, caller: &Caller, id: i64) -> Result<(), AppError> {
        let link = self.get_link(id).await?;
        ensure_can_manage(caller, &link, "delete")?;

        if !self.link_repository.delete(id).await? {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        info!(link_id = id, owner = %caller.owner, "Link deleted");
        Ok(())
    }

    /// Connectivity check used by the health endpoint.
    pub async fn check_store(&self) -> Result<i64, AppError> {
        self.link_repository.count(None).await
    }

    /// Full public URL of a slug.
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), slug)
    }
}

fn parse_destination(destination: &str) -> Result<String, AppError> {
    validate_destination(destination).map_err(|e| {
        AppError::bad_request(e.to_string(), json!({ "destination": destination }))
    })
}

fn ensure_can_manage(caller: &Caller, link: &Link, action: &str) -> Result<(), AppError> {
    if caller.can_manage(link) {
        return Ok(());
    }

    Err(AppError::forbidden(
        format!("Permission denied. You can only {action} links you created."),
        json!({ "id": link.id }),
    ))
}
