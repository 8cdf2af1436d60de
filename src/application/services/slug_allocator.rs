//! Slug allocation with bounded collision retry.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::slug::{
    DEFAULT_SLUG_LENGTH, RandomSlugSource, SlugSource, is_reserved, validate_custom_slug,
};

/// Attempts made before giving up on a generated slug.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// How an allocated slug came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugOrigin {
    /// Supplied by the caller and accepted verbatim.
    Custom,
    /// Drawn from the slug source.
    Generated,
}

/// A slug that was free at allocation time.
///
/// Allocation only reads the store; the slug can still be lost to a concurrent
/// insert, which the caller detects through the store's unique constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedSlug {
    pub value: String,
    pub origin: SlugOrigin,
}

/// Produces unique slugs for new links.
///
/// Existence checks go through the injected [`LinkRepository`]; randomness through
/// the injected [`SlugSource`].
#[derive(Clone)]
pub struct SlugAllocator {
    source: Arc<dyn SlugSource>,
    length: usize,
}

impl SlugAllocator {
    pub fn new(source: Arc<dyn SlugSource>, length: usize) -> Self {
        Self { source, length }
    }

    /// Allocator backed by the OS-seeded thread RNG.
    pub fn random(length: usize) -> Self {
        Self::new(Arc::new(RandomSlugSource), length)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Allocates a slug, honoring `candidate` when given.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - candidate does not match `[A-Za-z0-9_-]{3,50}`
    ///   (checked before any store access)
    /// - [`AppError::Conflict`] - candidate already taken or reserved
    /// - [`AppError::Exhausted`] - [`MAX_ALLOCATION_ATTEMPTS`] generated slugs all collided
    /// - [`AppError::Internal`] - store failure during an existence check
    pub async fn allocate<L>(
        &self,
        links: &L,
        candidate: Option<&str>,
    ) -> Result<AllocatedSlug, AppError>
    where
        L: LinkRepository + ?Sized,
    {
        match candidate {
            Some(candidate) => self.accept_candidate(links, candidate).await,
            None => self.generate(links).await,
        }
    }

    async fn accept_candidate<L>(
        &self,
        links: &L,
        candidate: &str,
    ) -> Result<AllocatedSlug, AppError>
    where
        L: LinkRepository + ?Sized,
    {
        validate_custom_slug(candidate)?;

        if is_reserved(candidate) || links.exists_by_slug(candidate).await? {
            return Err(AppError::conflict(
                "Slug already exists",
                json!({ "slug": candidate }),
            ));
        }

        Ok(AllocatedSlug {
            value: candidate.to_string(),
            origin: SlugOrigin::Custom,
        })
    }

    async fn generate<L>(&self, links: &L) -> Result<AllocatedSlug, AppError>
    where
        L: LinkRepository + ?Sized,
    {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let slug = self.source.next_slug(self.length);

            if is_reserved(&slug) || links.exists_by_slug(&slug).await? {
                debug!(attempt, slug = %slug, "Generated slug collided");
                continue;
            }

            return Ok(AllocatedSlug {
                value: slug,
                origin: SlugOrigin::Generated,
            });
        }

        Err(AppError::exhausted(
            "Failed to generate unique slug",
            json!({ "attempts": MAX_ALLOCATION_ATTEMPTS, "length": self.length }),
        ))
    }
}

impl Default for SlugAllocator {
    fn default() -> Self {
        Self::random(DEFAULT_SLUG_LENGTH)
    }
}
