//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkFilter, LinkSummary, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses bound parameters throughout; search terms are matched with `ILIKE` after
/// escaping the pattern metacharacters.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    slug: String,
    destination: String,
    owner: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.slug, r.destination, r.owner, r.created_at).updated(r.updated_at)
    }
}

#[derive(sqlx::FromRow)]
struct LinkSummaryRow {
    id: i64,
    slug: String,
    destination: String,
    owner: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    click_count: i64,
    last_click_at: Option<DateTime<Utc>>,
}

impl From<LinkSummaryRow> for LinkSummary {
    fn from(r: LinkSummaryRow) -> Self {
        LinkSummary {
            link: Link::new(r.id, r.slug, r.destination, r.owner, r.created_at)
                .updated(r.updated_at),
            click_count: r.click_count,
            last_click_at: r.last_click_at,
        }
    }
}

/// Builds an `ILIKE` pattern matching `term` literally anywhere in the value.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (slug, destination, owner)
            VALUES ($1, $2, $3)
            RETURNING id, slug, destination, owner, created_at, updated_at
            "#,
        )
        .bind(&new_link.slug)
        .bind(&new_link.destination)
        .bind(&new_link.owner)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            "SELECT id, slug, destination, owner, created_at, updated_at FROM links WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            "SELECT id, slug, destination, owner, created_at, updated_at FROM links WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn list(&self, filter: LinkFilter) -> Result<Vec<LinkSummary>, AppError> {
        let pattern = filter.search.as_deref().map(contains_pattern);

        let rows = sqlx::query_as::<_, LinkSummaryRow>(
            r#"
            SELECT
                l.id,
                l.slug,
                l.destination,
                l.owner,
                l.created_at,
                l.updated_at,
                COUNT(c.id) AS click_count,
                MAX(c.clicked_at) AS last_click_at
            FROM links l
            LEFT JOIN link_clicks c ON c.link_id = l.id
            WHERE ($1::text IS NULL OR l.slug ILIKE $1 OR l.destination ILIKE $1)
            GROUP BY l.id
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        let pattern = search.as_deref().map(contains_pattern);

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM links
            WHERE ($1::text IS NULL OR slug ILIKE $1 OR destination ILIKE $1)
            "#,
        )
        .bind(pattern)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update_destination(
        &self,
        id: i64,
        destination: String,
    ) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE links SET destination = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, destination, owner, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(destination)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
