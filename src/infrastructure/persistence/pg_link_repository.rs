//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkUpdate, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for short links.
///
/// Slug uniqueness is enforced by the primary key; a violation surfaces as
/// [`AppError::Conflict`].
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
    slug: String,
    url: String,
    hostname: String,
    password_hash: Option<String>,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            slug: r.slug,
            url: r.url,
            hostname: r.hostname,
            password_hash: r.password_hash,
            click_count: r.click_count,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (slug, url, hostname, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING slug, url, hostname, password_hash, click_count, created_at
            "#,
        )
        .bind(&new_link.slug)
        .bind(&new_link.url)
        .bind(&new_link.hostname)
        .bind(&new_link.password_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM links WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn find(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT slug, url, hostname, password_hash, click_count, created_at
            FROM links
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT slug, url, hostname, password_hash, click_count, created_at
            FROM links
            ORDER BY created_at DESC, slug ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, slug: &str, update: LinkUpdate) -> Result<Option<Link>, AppError> {
        let change_password = update.password_hash.is_some();
        let new_hash = update.password_hash.flatten();

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE links SET
                url           = $2,
                slug          = COALESCE($3::TEXT, slug),
                password_hash = CASE WHEN $4 THEN $5::TEXT ELSE password_hash END
            WHERE slug = $1
            RETURNING slug, url, hostname, password_hash, click_count, created_at
            "#,
        )
        .bind(slug)
        .bind(&update.url)
        .bind(&update.new_slug)
        .bind(change_password)
        .bind(new_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(n)
    }
}
