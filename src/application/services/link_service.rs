//! Link creation, update and retrieval service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::application::services::auth_service::{
    hash_password_in_background, verify_password_in_background,
};
use crate::application::services::domain_service::DomainService;
use crate::application::services::slug_allocator::{SlugAllocator, SlugTarget};
use crate::domain::entities::{Link, LinkUpdate, NewLink, PasswordChange};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::slug::{SlugPolicy, validate_custom_slug};
use crate::utils::url_validator::validate_destination_url;

/// Input for creating a short link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub url: String,
    pub hostname: Option<String>,
    pub slug: Option<String>,
    pub password: Option<String>,
}

/// Input for updating a short link.
#[derive(Debug, Clone)]
pub struct UpdateLink {
    pub original_slug: String,
    pub url: String,
    pub new_slug: Option<String>,
    pub password: PasswordChange,
}

/// Service for creating, updating and retrieving short links.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    domains: Arc<DomainService>,
    allocator: SlugAllocator,
}

/// A link waiting for its slug.
struct PendingLink<'a> {
    repository: &'a dyn LinkRepository,
    url: &'a str,
    hostname: &'a str,
    password_hash: Option<&'a str>,
}

#[async_trait]
impl SlugTarget for PendingLink<'_> {
    type Output = Link;

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        self.repository.slug_exists(slug).await
    }

    async fn insert_with_slug(&self, slug: String) -> Result<Link, AppError> {
        self.repository
            .insert(NewLink {
                slug,
                url: self.url.to_string(),
                hostname: self.hostname.to_string(),
                password_hash: self.password_hash.map(str::to_string),
            })
            .await
    }
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(repository: Arc<dyn LinkRepository>, domains: Arc<DomainService>) -> Self {
        Self {
            repository,
            domains,
            allocator: SlugAllocator::new(SlugPolicy::LINK),
        }
    }

    /// Creates a short link.
    ///
    /// The destination must be an `http`/`https` URL. Without a hostname the
    /// primary domain is used. A custom slug is used verbatim; otherwise one
    /// is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL, custom slug or
    /// unknown hostname.
    /// Returns [`AppError::Conflict`] if the custom slug is taken.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_link(&self, input: CreateLink) -> Result<Link, AppError> {
        let url = validate_destination_url(&input.url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let hostname = self
            .domains
            .resolve_hostname(input.hostname.as_deref())
            .await?;

        let password_hash = match input.password.as_deref() {
            Some(p) if !p.is_empty() => Some(hash_password_in_background(p).await?),
            _ => None,
        };

        let pending = PendingLink {
            repository: self.repository.as_ref(),
            url: &url,
            hostname: &hostname,
            password_hash: password_hash.as_deref(),
        };

        let link = self
            .allocator
            .allocate(&pending, input.slug.as_deref())
            .await?;

        tracing::info!(
            slug = %link.slug,
            hostname = %link.hostname,
            protected = link.is_protected(),
            "Link created"
        );

        Ok(link)
    }

    /// Updates destination, slug and password of an existing link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL or new slug.
    /// Returns [`AppError::NotFound`] if `original_slug` does not exist.
    /// Returns [`AppError::Conflict`] if the new slug belongs to another link.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update_link(&self, input: UpdateLink) -> Result<Link, AppError> {
        let url = validate_destination_url(&input.url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let password_kind = input.password_kind();
        let new_slug = input
            .new_slug
            .filter(|s| !s.is_empty() && *s != input.original_slug);

        if let Some(ref slug) = new_slug {
            validate_custom_slug(slug)?;
            if self.repository.slug_exists(slug).await? {
                return Err(AppError::conflict(
                    "Slug already in use",
                    json!({ "slug": slug }),
                ));
            }
        }

        let password_hash = match input.password {
            PasswordChange::Keep => None,
            PasswordChange::Clear => Some(None),
            PasswordChange::Set(ref p) => Some(Some(hash_password_in_background(p).await?)),
        };

        let update = LinkUpdate {
            url,
            new_slug: new_slug.clone(),
            password_hash,
        };

        let link = self
            .repository
            .update(&input.original_slug, update)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    AppError::conflict("Slug already in use", json!({ "slug": new_slug }))
                } else {
                    e
                }
            })?
            .ok_or_else(|| {
                AppError::not_found(
                    "Link not found",
                    json!({ "slug": input.original_slug }),
                )
            })?;

        tracing::info!(
            slug = %input.original_slug,
            new_slug = %link.slug,
            password = password_kind,
            "Link updated"
        );

        Ok(link)
    }

    /// Deletes a link and its click history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_link(&self, slug: &str) -> Result<(), AppError> {
        if !self.repository.delete(slug).await? {
            return Err(AppError::not_found("Link not found", json!({ "slug": slug })));
        }

        tracing::info!(slug = %slug, "Link deleted");
        Ok(())
    }

    /// Retrieves a link by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has that slug.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_link(&self, slug: &str) -> Result<Link, AppError> {
        self.find_link(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "slug": slug })))
    }

    /// Looks up a link without turning absence into an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn find_link(&self, slug: &str) -> Result<Option<Link>, AppError> {
        self.repository.find(slug).await
    }

    /// Lists all links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.repository.list().await
    }

    /// Counts all links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Checks a visitor's password for a protected link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or has no password.
    /// Returns [`AppError::Unauthorized`] if the password is wrong.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn check_password(&self, slug: &str, password: &str) -> Result<Link, AppError> {
        let link = self
            .find_link(slug)
            .await?
            .filter(Link::is_protected)
            .ok_or_else(|| {
                AppError::not_found(
                    "Link not found or not password protected",
                    json!({ "slug": slug }),
                )
            })?;

        let hash = link.password_hash.as_deref().unwrap_or_default();
        if !verify_password_in_background(password, hash).await? {
            return Err(AppError::unauthorized(
                "Incorrect password",
                json!({ "slug": slug }),
            ));
        }

        Ok(link)
    }
}

impl UpdateLink {
    fn password_kind(&self) -> &'static str {
        match self.password {
            PasswordChange::Keep => "kept",
            PasswordChange::Clear => "cleared",
            PasswordChange::Set(_) => "replaced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::auth_service::{hash_password, verify_password};
    use crate::domain::entities::Domain;
    use crate::domain::repositories::{MockDomainRepository, MockLinkRepository};
    use axum::http::StatusCode;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn domains() -> Arc<DomainService> {
        let mut repo = MockDomainRepository::new();
        repo.expect_find()
            .returning(|h| Ok((h == "s.example.com").then(|| Domain::new(h.to_string(), Utc::now()))));
        repo.expect_primary()
            .returning(|| Ok(Some(Domain::new("s.example.com".to_string(), Utc::now()))));
        Arc::new(DomainService::new(Arc::new(repo), None))
    }

    fn link_from(new_link: NewLink) -> Link {
        Link {
            slug: new_link.slug,
            url: new_link.url,
            hostname: new_link.hostname,
            password_hash: new_link.password_hash,
            click_count: 0,
            created_at: Utc::now(),
        }
    }

    fn stored(slug: &str, password: Option<&str>) -> Link {
        Link {
            slug: slug.to_string(),
            url: "https://old.example.com".to_string(),
            hostname: "s.example.com".to_string(),
            password_hash: password.map(|p| hash_password(p).unwrap()),
            click_count: 3,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_link_generates_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_slug_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .times(1)
            .returning(|new_link| Ok(link_from(new_link)));

        let service = LinkService::new(Arc::new(repo), domains());

        let link = service
            .create_link(CreateLink {
                url: "https://long.example.com/x".to_string(),
                hostname: Some("s.example.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(link.slug.len(), 7);
        assert_eq!(link.url, "https://long.example.com/x");
        assert_eq!(link.short_url(), format!("https://s.example.com/{}", link.slug));
        assert!(!link.is_protected());
    }

    #[tokio::test]
    async fn test_create_link_uses_primary_domain() {
        let mut repo = MockLinkRepository::new();
        repo.expect_slug_exists().returning(|_| Ok(false));
        repo.expect_insert().returning(|new_link| Ok(link_from(new_link)));

        let service = LinkService::new(Arc::new(repo), domains());

        let link = service
            .create_link(CreateLink {
                url: "https://long.example.com/x".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(link.hostname, "s.example.com");
    }

    #[tokio::test]
    async fn test_create_link_hashes_password() {
        let mut repo = MockLinkRepository::new();
        repo.expect_slug_exists().returning(|_| Ok(false));
        repo.expect_insert().returning(|new_link| Ok(link_from(new_link)));

        let service = LinkService::new(Arc::new(repo), domains());

        let link = service
            .create_link(CreateLink {
                url: "https://long.example.com/x".to_string(),
                slug: Some("secret-link".to_string()),
                password: Some("secret".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let hash = link.password_hash.unwrap();
        assert_ne!(hash, "secret");
        assert!(verify_password("secret", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_link_custom_slug_conflict() {
        let mut repo = MockLinkRepository::new();
        repo.expect_slug_exists()
            .with(eq("abc123"))
            .returning(|_| Ok(true));
        repo.expect_insert().never();

        let service = LinkService::new(Arc::new(repo), domains());

        let err = service
            .create_link(CreateLink {
                url: "https://long.example.com/x".to_string(),
                slug: Some("abc123".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_link_rejects_bad_input() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().never();
        let service = LinkService::new(Arc::new(repo), domains());

        for (url, hostname) in [
            ("javascript:alert(1)", "s.example.com"),
            ("not a url", "s.example.com"),
            ("https://ok.example.com", "unknown.example.com"),
        ] {
            let err = service
                .create_link(CreateLink {
                    url: url.to_string(),
                    hostname: Some(hostname.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{url} / {hostname}");
        }
    }

    #[tokio::test]
    async fn test_update_keeps_password_when_absent() {
        let mut repo = MockLinkRepository::new();
        repo.expect_update()
            .withf(|slug, update| slug == "abc123" && update.password_hash.is_none())
            .times(1)
            .returning(|slug, update| {
                Ok(Some(Link {
                    url: update.url,
                    ..stored(slug, Some("kept"))
                }))
            });

        let service = LinkService::new(Arc::new(repo), domains());

        let link = service
            .update_link(UpdateLink {
                original_slug: "abc123".to_string(),
                url: "https://new.example.com".to_string(),
                new_slug: None,
                password: PasswordChange::Keep,
            })
            .await
            .unwrap();

        assert_eq!(link.url, "https://new.example.com");
        assert!(link.is_protected());
    }

    #[tokio::test]
    async fn test_update_clears_and_replaces_password() {
        let mut repo = MockLinkRepository::new();
        repo.expect_update()
            .withf(|_, update| update.password_hash == Some(None))
            .times(1)
            .returning(|slug, _| Ok(Some(stored(slug, None))));
        repo.expect_update()
            .withf(|_, update| matches!(update.password_hash, Some(Some(_))))
            .times(1)
            .returning(|slug, update| {
                Ok(Some(Link {
                    password_hash: update.password_hash.flatten(),
                    ..stored(slug, None)
                }))
            });

        let service = LinkService::new(Arc::new(repo), domains());

        let cleared = service
            .update_link(UpdateLink {
                original_slug: "abc123".to_string(),
                url: "https://new.example.com".to_string(),
                new_slug: None,
                password: PasswordChange::Clear,
            })
            .await
            .unwrap();
        assert!(!cleared.is_protected());

        let replaced = service
            .update_link(UpdateLink {
                original_slug: "abc123".to_string(),
                url: "https://new.example.com".to_string(),
                new_slug: None,
                password: PasswordChange::Set("x".to_string()),
            })
            .await
            .unwrap();
        assert!(verify_password("x", replaced.password_hash.as_deref().unwrap()).unwrap());
    }

    #[tokio::test]
    async fn test_update_rename_conflict() {
        let mut repo = MockLinkRepository::new();
        repo.expect_slug_exists()
            .with(eq("taken"))
            .returning(|_| Ok(true));
        repo.expect_update().never();

        let service = LinkService::new(Arc::new(repo), domains());

        let err = service
            .update_link(UpdateLink {
                original_slug: "abc123".to_string(),
                url: "https://new.example.com".to_string(),
                new_slug: Some("taken".to_string()),
                password: PasswordChange::Keep,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_same_slug_is_not_a_rename() {
        let mut repo = MockLinkRepository::new();
        repo.expect_slug_exists().never();
        repo.expect_update()
            .withf(|_, update| update.new_slug.is_none())
            .returning(|slug, _| Ok(Some(stored(slug, None))));

        let service = LinkService::new(Arc::new(repo), domains());

        assert!(
            service
                .update_link(UpdateLink {
                    original_slug: "abc123".to_string(),
                    url: "https://new.example.com".to_string(),
                    new_slug: Some("abc123".to_string()),
                    password: PasswordChange::Keep,
                })
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_missing_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let service = LinkService::new(Arc::new(repo), domains());

        let err = service
            .update_link(UpdateLink {
                original_slug: "gone".to_string(),
                url: "https://new.example.com".to_string(),
                new_slug: None,
                password: PasswordChange::Keep,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let service = LinkService::new(Arc::new(repo), domains());

        let err = service.delete_link("nope").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_check_password() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find()
            .with(eq("locked"))
            .returning(|slug| Ok(Some(stored(slug, Some("secret")))));
        repo.expect_find()
            .with(eq("open"))
            .returning(|slug| Ok(Some(stored(slug, None))));

        let service = LinkService::new(Arc::new(repo), domains());

        assert!(service.check_password("locked", "secret").await.is_ok());
        assert_eq!(
            service.check_password("locked", "nope").await.unwrap_err().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            service.check_password("open", "secret").await.unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
    }
}
