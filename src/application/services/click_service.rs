//! Click ledger service.

use std::sync::Arc;

use crate::domain::entities::{Click, ClientInfo};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Service for recording and listing clicks.
///
/// Recording is awaited by the caller before it responds; nothing is queued
/// in the background.
pub struct ClickService {
    repository: Arc<dyn ClickRepository>,
}

impl ClickService {
    /// Creates a new click service.
    pub fn new(repository: Arc<dyn ClickRepository>) -> Self {
        Self { repository }
    }

    /// Appends a click for `slug` and bumps the link's counter atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link vanished.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn record(&self, slug: &str, client: ClientInfo) -> Result<Click, AppError> {
        self.repository.record(client.into_click(slug)).await
    }

    /// Records a click, logging instead of failing.
    ///
    /// Returns true if the click was stored.
    pub async fn record_best_effort(&self, slug: &str, client: ClientInfo) -> bool {
        match self.record(slug, client).await {
            Ok(click) => {
                tracing::debug!(slug = %slug, click_id = click.id, "Click recorded");
                true
            }
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, details = %e.details(), "Failed to record click");
                false
            }
        }
    }

    /// Lists the clicks of one link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_for_link(&self, slug: &str) -> Result<Vec<Click>, AppError> {
        self.repository.list_for_link(slug).await
    }

    /// Counts every recorded click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_clicks(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockClickRepository;
    use chrono::Utc;
    use serde_json::json;

    fn client() -> ClientInfo {
        ClientInfo {
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("curl/8.0".to_string()),
            referrer: Some("https://news.example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_record_passes_client_metadata() {
        let mut repo = MockClickRepository::new();
        repo.expect_record()
            .withf(|c| {
                c.link_slug == "abc123"
                    && c.ip_address.as_deref() == Some("203.0.113.7")
                    && c.user_agent.as_deref() == Some("curl/8.0")
                    && c.referrer.as_deref() == Some("https://news.example.com")
            })
            .times(1)
            .returning(|c| {
                Ok(Click {
                    id: 1,
                    link_slug: c.link_slug,
                    ip_address: c.ip_address,
                    user_agent: c.user_agent,
                    referrer: c.referrer,
                    clicked_at: Utc::now(),
                })
            });

        let service = ClickService::new(Arc::new(repo));

        let click = service.record("abc123", client()).await.unwrap();
        assert_eq!(click.id, 1);
    }

    #[tokio::test]
    async fn test_record_best_effort_swallows_errors() {
        let mut repo = MockClickRepository::new();
        repo.expect_record()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = ClickService::new(Arc::new(repo));

        assert!(!service.record_best_effort("abc123", client()).await);
    }
}
