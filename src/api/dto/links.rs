//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::pagination::PaginationMeta;
use crate::domain::entities::{Link, LinkSummary};

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "Destination URL is required"))]
    pub destination: String,

    /// Requested slug. Empty means "generate one".
    #[serde(default, alias = "candidateIdentifier")]
    pub custom_slug: Option<String>,
}

/// Request body for `PUT /api/links/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "Destination URL is required"))]
    pub destination: String,
}

/// A link as returned by create and update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    pub destination: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub short_url: String,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            slug: link.slug,
            destination: link.destination,
            owner: link.owner,
            created_at: link.created_at,
            updated_at: link.updated_at,
            short_url,
        }
    }
}

/// A row of `GET /api/links`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkListItem {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub click_count: i64,
    pub last_click_at: Option<DateTime<Utc>>,
}

impl LinkListItem {
    pub fn new(summary: LinkSummary, short_url: String) -> Self {
        Self {
            link: LinkResponse::new(summary.link, short_url),
            click_count: summary.click_count,
            last_click_at: summary.last_click_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkListItem>,
    pub pagination: PaginationMeta,
}
