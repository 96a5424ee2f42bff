//! PostgreSQL implementation of the domain registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Domain, DomainRemoval};
use crate::domain::repositories::DomainRepository;
use crate::error::AppError;

/// PostgreSQL repository for registered hostnames.
///
/// Removal locks every domain row before counting so the "at least one
/// domain" floor holds under concurrent deletes.
pub struct PgDomainRepository {
    pool: Arc<PgPool>,
}

impl PgDomainRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DomainRow {
    hostname: String,
    added_at: DateTime<Utc>,
}

impl From<DomainRow> for Domain {
    fn from(r: DomainRow) -> Self {
        Domain::new(r.hostname, r.added_at)
    }
}

#[async_trait]
impl DomainRepository for PgDomainRepository {
    async fn insert(&self, hostname: &str) -> Result<Domain, AppError> {
        let row = sqlx::query_as::<_, DomainRow>(
            r#"
            INSERT INTO domains (hostname)
            VALUES ($1)
            RETURNING hostname, added_at
            "#,
        )
        .bind(hostname)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find(&self, hostname: &str) -> Result<Option<Domain>, AppError> {
        let row = sqlx::query_as::<_, DomainRow>(
            "SELECT hostname, added_at FROM domains WHERE hostname = $1",
        )
        .bind(hostname)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Domain>, AppError> {
        let rows = sqlx::query_as::<_, DomainRow>(
            "SELECT hostname, added_at FROM domains ORDER BY added_at ASC, hostname ASC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn primary(&self) -> Result<Option<Domain>, AppError> {
        let row = sqlx::query_as::<_, DomainRow>(
            r#"
            SELECT hostname, added_at FROM domains
            ORDER BY added_at ASC, hostname ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn remove(&self, hostname: &str) -> Result<DomainRemoval, AppError> {
        let mut tx = self.pool.begin().await?;

        let registered: Vec<String> =
            sqlx::query_scalar("SELECT hostname FROM domains ORDER BY hostname FOR UPDATE")
                .fetch_all(&mut *tx)
                .await?;

        if !registered.iter().any(|h| h == hostname) {
            return Ok(DomainRemoval::NotFound);
        }
        if registered.len() <= 1 {
            return Ok(DomainRemoval::LastDomain);
        }

        sqlx::query("DELETE FROM domains WHERE hostname = $1")
            .bind(hostname)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DomainRemoval::Deleted)
    }
}
