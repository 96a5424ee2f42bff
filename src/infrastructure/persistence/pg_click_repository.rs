//! PostgreSQL implementation of the click ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for clicks.
///
/// The ledger row and the `links.click_count` increment share one transaction.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_slug: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    referrer: Option<String>,
    clicked_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_slug: r.link_slug,
            ip_address: r.ip_address,
            user_agent: r.user_agent,
            referrer: r.referrer,
            clicked_at: r.clicked_at,
        }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the link keeps a concurrent delete or rename out until commit.
        let bumped = sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE slug = $1")
            .bind(&new_click.link_slug)
            .execute(&mut *tx)
            .await?;

        if bumped.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "slug": new_click.link_slug }),
            ));
        }

        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (link_slug, ip_address, user_agent, referrer)
            VALUES ($1, $2, $3, $4)
            RETURNING id, link_slug, ip_address, user_agent, referrer, clicked_at
            "#,
        )
        .bind(&new_click.link_slug)
        .bind(&new_click.ip_address)
        .bind(&new_click.user_agent)
        .bind(&new_click.referrer)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn list_for_link(&self, slug: &str) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_slug, ip_address, user_agent, referrer, clicked_at
            FROM clicks
            WHERE link_slug = $1
            ORDER BY clicked_at DESC, id DESC
            "#,
        )
        .bind(slug)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(n)
    }
}
