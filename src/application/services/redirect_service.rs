//! Redirect resolution: host check, slug lookup, password gate, click logging.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::click_service::ClickService;
use crate::application::services::domain_service::DomainService;
use crate::application::services::link_service::LinkService;
use crate::domain::entities::ClientInfo;
use crate::error::AppError;
use crate::utils::slug::is_reserved;

/// What a request for `/{slug}` resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path belongs to the dashboard, not to a link.
    Dashboard,
    /// Send the visitor to the password prompt for this slug.
    PasswordPrompt(String),
    /// Permanent redirect to the destination.
    Redirect(String),
}

/// Composes the domain registry, link store and click ledger into the
/// redirect decision.
pub struct RedirectService {
    domains: Arc<DomainService>,
    links: Arc<LinkService>,
    clicks: Arc<ClickService>,
}

impl RedirectService {
    pub fn new(
        domains: Arc<DomainService>,
        links: Arc<LinkService>,
        clicks: Arc<ClickService>,
    ) -> Self {
        Self {
            domains,
            links,
            clicks,
        }
    }

    /// Resolves a public GET of `/{slug}` on `host`.
    ///
    /// Unknown hosts and unknown slugs both yield the same generic 404.
    /// Protected links never resolve directly and log no click here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unaccepted host or unknown slug.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(
        &self,
        host: Option<&str>,
        slug: &str,
        client: ClientInfo,
    ) -> Result<Resolution, AppError> {
        let resolution = self.preview(host, slug).await?;

        if let Resolution::Redirect(_) = resolution {
            self.clicks.record_best_effort(slug, client).await;
        }

        Ok(resolution)
    }

    /// Same decision as [`resolve`](Self::resolve) but logs no click.
    /// Used for HEAD requests.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub async fn preview(&self, host: Option<&str>, slug: &str) -> Result<Resolution, AppError> {
        let accepted = match host {
            Some(h) => self.domains.accepts_host(h).await?,
            None => false,
        };
        if !accepted {
            return Err(not_found(json!({ "reason": "domain not configured", "host": host })));
        }

        if slug.is_empty() || is_reserved(slug) {
            return Ok(Resolution::Dashboard);
        }

        let link = self
            .links
            .find_link(slug)
            .await?
            .ok_or_else(|| not_found(json!({ "reason": "unknown slug", "slug": slug })))?;

        if link.is_protected() {
            return Ok(Resolution::PasswordPrompt(link.slug));
        }

        Ok(Resolution::Redirect(link.url))
    }

    /// Checks a protected link's password and, on success, logs the click
    /// and returns the destination URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is missing or unprotected.
    /// Returns [`AppError::Unauthorized`] for a wrong password.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn unlock(
        &self,
        slug: &str,
        password: &str,
        client: ClientInfo,
    ) -> Result<String, AppError> {
        let link = self.links.check_password(slug, password).await?;

        self.clicks.record_best_effort(&link.slug, client).await;

        Ok(link.url)
    }
}

fn not_found(details: serde_json::Value) -> AppError {
    AppError::not_found("Not found", details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::auth_service::hash_password;
    use crate::domain::entities::{Click, Domain, Link};
    use crate::domain::repositories::{
        MockClickRepository, MockDomainRepository, MockLinkRepository,
    };
    use axum::http::StatusCode;
    use chrono::Utc;

    fn link(slug: &str, password: Option<&str>) -> Link {
        Link {
            slug: slug.to_string(),
            url: "https://long.example.com/x".to_string(),
            hostname: "s.example.com".to_string(),
            password_hash: password.map(|p| hash_password(p).unwrap()),
            click_count: 0,
            created_at: Utc::now(),
        }
    }

    fn click_ok(c: crate::domain::entities::NewClick) -> Result<Click, AppError> {
        Ok(Click {
            id: 1,
            link_slug: c.link_slug,
            ip_address: c.ip_address,
            user_agent: c.user_agent,
            referrer: c.referrer,
            clicked_at: Utc::now(),
        })
    }

    fn service(links: MockLinkRepository, clicks: MockClickRepository) -> RedirectService {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_find()
            .returning(|h| Ok((h == "s.example.com").then(|| Domain::new(h.to_string(), Utc::now()))));

        let domains = Arc::new(DomainService::new(
            Arc::new(domains),
            Some("app.example.com".to_string()),
        ));
        let links = Arc::new(LinkService::new(Arc::new(links), domains.clone()));
        let clicks = Arc::new(ClickService::new(Arc::new(clicks)));

        RedirectService::new(domains, links, clicks)
    }

    #[tokio::test]
    async fn test_redirect_logs_click() {
        let mut links = MockLinkRepository::new();
        links.expect_find().returning(|s| Ok(Some(link(s, None))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record().times(1).returning(click_ok);

        let resolution = service(links, clicks)
            .resolve(Some("s.example.com"), "abc1234", ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Redirect("https://long.example.com/x".to_string())
        );
    }

    #[tokio::test]
    async fn test_preview_logs_no_click() {
        let mut links = MockLinkRepository::new();
        links.expect_find().returning(|s| Ok(Some(link(s, None))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record().never();

        let resolution = service(links, clicks)
            .preview(Some("s.example.com"), "abc1234")
            .await
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Redirect("https://long.example.com/x".to_string())
        );
    }

    #[tokio::test]
    async fn test_click_failure_does_not_block_redirect() {
        let mut links = MockLinkRepository::new();
        links.expect_find().returning(|s| Ok(Some(link(s, None))));
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let resolution = service(links, clicks)
            .resolve(Some("app.example.com"), "abc1234", ClientInfo::default())
            .await
            .unwrap();

        assert!(matches!(resolution, Resolution::Redirect(_)));
    }

    #[tokio::test]
    async fn test_protected_link_prompts_without_click() {
        let mut links = MockLinkRepository::new();
        links.expect_find().returning(|s| Ok(Some(link(s, Some("secret")))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record().never();

        let resolution = service(links, clicks)
            .resolve(Some("s.example.com"), "locked1", ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::PasswordPrompt("locked1".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_host_and_slug_look_alike() {
        let mut links = MockLinkRepository::new();
        links.expect_find().returning(|_| Ok(None));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record().never();

        let svc = service(links, clicks);

        let bad_host = svc
            .resolve(Some("evil.example.com"), "abc1234", ClientInfo::default())
            .await
            .unwrap_err();
        let bad_slug = svc
            .resolve(Some("s.example.com"), "missing", ClientInfo::default())
            .await
            .unwrap_err();
        let no_host = svc
            .resolve(None, "abc1234", ClientInfo::default())
            .await
            .unwrap_err();

        assert_eq!(bad_host.status(), StatusCode::NOT_FOUND);
        assert_eq!(bad_host.message(), bad_slug.message());
        assert_eq!(no_host.message(), bad_slug.message());
    }

    #[tokio::test]
    async fn test_reserved_paths_go_to_dashboard() {
        let mut links = MockLinkRepository::new();
        links.expect_find().never();

        let svc = service(links, MockClickRepository::new());

        for path in ["", "dashboard", "favicon.ico", "login"] {
            assert_eq!(
                svc.resolve(Some("s.example.com"), path, ClientInfo::default())
                    .await
                    .unwrap(),
                Resolution::Dashboard
            );
        }
    }

    #[tokio::test]
    async fn test_unlock_logs_exactly_one_click() {
        let mut links = MockLinkRepository::new();
        links.expect_find().returning(|s| Ok(Some(link(s, Some("secret")))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record().times(1).returning(click_ok);

        let svc = service(links, clicks);

        let url = svc
            .unlock("locked1", "secret", ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(url, "https://long.example.com/x");
    }

    #[tokio::test]
    async fn test_unlock_wrong_password_logs_nothing() {
        let mut links = MockLinkRepository::new();
        links.expect_find().returning(|s| Ok(Some(link(s, Some("secret")))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record().never();

        let err = service(links, clicks)
            .unlock("locked1", "guess", ClientInfo::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
