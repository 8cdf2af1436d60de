//! Link entity representing a slug → destination mapping.

use chrono::{DateTime, Utc};

/// A persisted short link.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub destination: String,
    /// Opaque identity of the creator, as issued by the identity provider.
    pub owner: String,
    pub created_at: DateTime<Utc>,
    /// Last destination change; equals `created_at` until the first update.
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a link that has never been updated.
    pub fn new(
        id: i64,
        slug: String,
        destination: String,
        owner: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            slug,
            destination,
            owner,
            created_at,
            updated_at: created_at,
        }
    }

    /// Sets the last modification time.
    pub fn updated(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: String,
    pub destination: String,
    pub owner: String,
}

/// A link together with its aggregated click data, as shown in listings.
#[derive(Debug, Clone)]
pub struct LinkSummary {
    pub link: Link,
    pub click_count: i64,
    pub last_click_at: Option<DateTime<Utc>>,
}

/// Listing criteria: case-insensitive search plus offset pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkFilter {
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl LinkFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            search: None,
            offset,
            limit,
        }
    }

    /// Adds a search term. Blank terms are ignored.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}
