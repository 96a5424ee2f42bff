//! PostgreSQL implementation of paste repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewPaste, Paste};
use crate::domain::repositories::PasteRepository;
use crate::error::AppError;

/// PostgreSQL repository for pastes.
pub struct PgPasteRepository {
    pool: Arc<PgPool>,
}

impl PgPasteRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PasteRow {
    slug: String,
    content: String,
    hostname: String,
    password_hash: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<PasteRow> for Paste {
    fn from(r: PasteRow) -> Self {
        Paste {
            slug: r.slug,
            content: r.content,
            hostname: r.hostname,
            password_hash: r.password_hash,
            expires_at: r.expires_at,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl PasteRepository for PgPasteRepository {
    async fn insert(&self, new_paste: NewPaste) -> Result<Paste, AppError> {
        let row = sqlx::query_as::<_, PasteRow>(
            r#"
            INSERT INTO pastes (slug, content, hostname, password_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING slug, content, hostname, password_hash, expires_at, created_at
            "#,
        )
        .bind(&new_paste.slug)
        .bind(&new_paste.content)
        .bind(&new_paste.hostname)
        .bind(&new_paste.password_hash)
        .bind(new_paste.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pastes WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn find(&self, slug: &str) -> Result<Option<Paste>, AppError> {
        let row = sqlx::query_as::<_, PasteRow>(
            r#"
            SELECT slug, content, hostname, password_hash, expires_at, created_at
            FROM pastes
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Paste>, AppError> {
        let rows = sqlx::query_as::<_, PasteRow>(
            r#"
            SELECT slug, content, hostname, password_hash, expires_at, created_at
            FROM pastes
            ORDER BY created_at DESC, slug ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pastes WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM pastes WHERE expires_at IS NOT NULL AND expires_at <= $1")
                .bind(now)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pastes")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(n)
    }
}
