//! Domain registry service.

use crate::domain::entities::{Domain, DomainRemoval, normalize_hostname};
use crate::domain::repositories::DomainRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service for the hostnames allowed to serve short links.
///
/// Hostnames are case-normalized before every lookup and write. At least one
/// domain stays registered once any has been added.
pub struct DomainService {
    repository: Arc<dyn DomainRepository>,
    app_hostname: Option<String>,
}

impl DomainService {
    /// Creates a new domain service.
    ///
    /// `app_hostname` is the canonical hostname, which is always accepted as
    /// a request host and used as the last-resort short URL host.
    pub fn new(repository: Arc<dyn DomainRepository>, app_hostname: Option<String>) -> Self {
        Self {
            repository,
            app_hostname: app_hostname.map(|h| normalize_hostname(&h)),
        }
    }

    /// Registers a hostname.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the hostname is malformed.
    /// Returns [`AppError::Conflict`] if it is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn add(&self, hostname: &str) -> Result<Domain, AppError> {
        let hostname = normalize_hostname(hostname);
        validate_hostname(&hostname)?;

        let exists = || AppError::conflict("Domain already exists", json!({ "hostname": hostname }));

        if self.repository.find(&hostname).await?.is_some() {
            return Err(exists());
        }

        let domain = self
            .repository
            .insert(&hostname)
            .await
            .map_err(|e| if e.is_conflict() { exists() } else { e })?;

        tracing::info!(hostname = %domain.hostname, "Domain added");

        Ok(domain)
    }

    /// Removes a hostname, refusing to remove the last one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the hostname is empty or the last domain.
    /// Returns [`AppError::NotFound`] if it is not registered.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn remove(&self, hostname: &str) -> Result<(), AppError> {
        let hostname = normalize_hostname(hostname);
        if hostname.is_empty() {
            return Err(AppError::bad_request("Hostname is required", json!({})));
        }

        match self.repository.remove(&hostname).await? {
            DomainRemoval::Deleted => {
                tracing::info!(hostname = %hostname, "Domain removed");
                Ok(())
            }
            DomainRemoval::NotFound => Err(AppError::not_found(
                "Domain not found",
                json!({ "hostname": hostname }),
            )),
            DomainRemoval::LastDomain => Err(AppError::bad_request(
                "Cannot remove the last domain",
                json!({ "hostname": hostname }),
            )),
        }
    }

    /// Lists domains in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(&self) -> Result<Vec<Domain>, AppError> {
        self.repository.list().await
    }

    /// Returns true if `host` is registered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn is_valid_host(&self, host: &str) -> Result<bool, AppError> {
        let host = normalize_hostname(host);
        if host.is_empty() {
            return Ok(false);
        }
        Ok(self.repository.find(&host).await?.is_some())
    }

    /// Returns true if `host` is the canonical hostname or registered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn accepts_host(&self, host: &str) -> Result<bool, AppError> {
        if self.is_app_hostname(host) {
            return Ok(true);
        }
        self.is_valid_host(host).await
    }

    pub fn is_app_hostname(&self, host: &str) -> bool {
        self.app_hostname
            .as_deref()
            .is_some_and(|app| app == normalize_hostname(host))
    }

    /// The earliest-added domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn primary_domain(&self) -> Result<Option<String>, AppError> {
        Ok(self.repository.primary().await?.map(|d| d.hostname))
    }

    /// Picks the hostname a new link or paste is created under.
    ///
    /// A requested hostname must be registered (or be the canonical host).
    /// Without one, the primary domain is used, then the canonical host.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the requested hostname is unknown
    /// or no hostname is available at all.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve_hostname(&self, requested: Option<&str>) -> Result<String, AppError> {
        if let Some(requested) = requested.map(normalize_hostname).filter(|h| !h.is_empty()) {
            if self.accepts_host(&requested).await? {
                return Ok(requested);
            }
            return Err(AppError::bad_request(
                "Unknown domain",
                json!({ "hostname": requested }),
            ));
        }

        if let Some(primary) = self.primary_domain().await? {
            return Ok(primary);
        }

        self.app_hostname.clone().ok_or_else(|| {
            AppError::bad_request(
                "No domain configured",
                json!({ "hint": "Add a domain first" }),
            )
        })
    }
}

/// Validates hostname format.
///
/// # Rules
///
/// - Length: 1-253 characters
/// - Must contain at least one dot, or be `localhost`
/// - Labels are non-empty and use only letters, digits and hyphens
fn validate_hostname(hostname: &str) -> Result<(), AppError> {
    if hostname.is_empty() || hostname.len() > 253 {
        return Err(AppError::bad_request(
            "Invalid hostname length",
            json!({ "min": 1, "max": 253 }),
        ));
    }

    if !hostname.contains('.') && hostname != "localhost" {
        return Err(AppError::bad_request(
            "Invalid hostname format",
            json!({ "hint": "Hostname must contain at least one dot" }),
        ));
    }

    let labels_ok = hostname.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    if !labels_ok {
        return Err(AppError::bad_request(
            "Invalid characters in hostname",
            json!({ "allowed": "a-z, 0-9, dots, hyphens" }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockDomainRepository;
    use axum::http::StatusCode;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn domain(hostname: &str) -> Domain {
        Domain::new(hostname.to_string(), Utc::now())
    }

    fn service(repo: MockDomainRepository) -> DomainService {
        DomainService::new(Arc::new(repo), Some("app.example.com".to_string()))
    }

    #[tokio::test]
    async fn test_add_normalizes_hostname() {
        let mut repo = MockDomainRepository::new();
        repo.expect_find()
            .with(eq("s.example.com"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .with(eq("s.example.com"))
            .times(1)
            .returning(|h| Ok(domain(h)));

        let created = service(repo).add("S.Example.COM").await.unwrap();

        assert_eq!(created.hostname, "s.example.com");
    }

    #[tokio::test]
    async fn test_add_duplicate_conflicts() {
        let mut repo = MockDomainRepository::new();
        repo.expect_find()
            .returning(|h| Ok(Some(domain(h))));
        repo.expect_insert().never();

        let err = service(repo).add("s.example.com").await.unwrap_err();

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_add_race_maps_to_conflict() {
        let mut repo = MockDomainRepository::new();
        repo.expect_find().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let err = service(repo).add("s.example.com").await.unwrap_err();

        assert_eq!(err.message(), "Domain already exists");
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_hostnames() {
        for bad in ["", "nodot", "bad_host.com", "-a.com", "a..com", "a b.com"] {
            let mut repo = MockDomainRepository::new();
            repo.expect_find().never();
            let err = service(repo).add(bad).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{bad:?}");
        }
    }

    #[tokio::test]
    async fn test_remove_outcomes() {
        let cases = [
            (DomainRemoval::Deleted, None),
            (DomainRemoval::NotFound, Some(StatusCode::NOT_FOUND)),
            (DomainRemoval::LastDomain, Some(StatusCode::BAD_REQUEST)),
        ];

        for (outcome, expected) in cases {
            let mut repo = MockDomainRepository::new();
            repo.expect_remove()
                .with(eq("s.example.com"))
                .times(1)
                .returning(move |_| Ok(outcome));

            let result = service(repo).remove("S.example.com").await;

            assert_eq!(result.err().map(|e| e.status()), expected);
        }
    }

    #[tokio::test]
    async fn test_accepts_app_hostname_without_lookup() {
        let mut repo = MockDomainRepository::new();
        repo.expect_find().never();

        assert!(service(repo).accepts_host("APP.example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_accepts_registered_host() {
        let mut repo = MockDomainRepository::new();
        repo.expect_find()
            .with(eq("s.example.com"))
            .returning(|h| Ok(Some(domain(h))));
        repo.expect_find()
            .with(eq("evil.example.com"))
            .returning(|_| Ok(None));

        let svc = service(repo);

        assert!(svc.accepts_host("s.example.com").await.unwrap());
        assert!(!svc.accepts_host("evil.example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_resolve_hostname_fallbacks() {
        let mut repo = MockDomainRepository::new();
        repo.expect_primary()
            .times(1)
            .returning(|| Ok(Some(domain("first.example.com"))));
        assert_eq!(
            service(repo).resolve_hostname(None).await.unwrap(),
            "first.example.com"
        );

        let mut repo = MockDomainRepository::new();
        repo.expect_primary().times(1).returning(|| Ok(None));
        assert_eq!(
            service(repo).resolve_hostname(Some("  ")).await.unwrap(),
            "app.example.com"
        );

        let mut repo = MockDomainRepository::new();
        repo.expect_primary().returning(|| Ok(None));
        let err = DomainService::new(Arc::new(repo), None)
            .resolve_hostname(None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resolve_unknown_hostname() {
        let mut repo = MockDomainRepository::new();
        repo.expect_find().returning(|_| Ok(None));

        let err = service(repo)
            .resolve_hostname(Some("nope.example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Unknown domain");
    }
}
