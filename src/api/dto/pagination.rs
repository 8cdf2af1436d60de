//! Pagination and search query parameters.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::LinkFilter;

pub const DEFAULT_PAGE_LIMIT: u32 = 5;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Query parameters of `GET /api/links`.
///
/// Uses `serde_with` to parse numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,

    /// Case-insensitive substring of slug or destination.
    #[serde(default)]
    pub search: Option<String>,
}

impl ListLinksParams {
    /// Validates parameters and resolves defaults.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `limit`: 5
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Limit must be between 1 and 100
    pub fn resolve(&self) -> Result<(u32, u32), String> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(format!("Limit must be between 1 and {MAX_PAGE_LIMIT}"));
        }

        Ok((page, limit))
    }

    /// Repository filter for a resolved page.
    pub fn to_filter(&self, page: u32, limit: u32) -> LinkFilter {
        let offset = (i64::from(page) - 1) * i64::from(limit);
        LinkFilter::new(offset, i64::from(limit)).with_search(self.search.clone())
    }
}

/// Pagination block of list responses.
#[derive(Debug, Serialize, PartialEq)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i64 = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            pages: (total + limit_i64 - 1) / limit_i64,
        }
    }
}
