//! Paste creation and retrieval service with lazy expiry.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::application::services::auth_service::{
    hash_password_in_background, verify_password_in_background,
};
use crate::application::services::domain_service::DomainService;
use crate::application::services::slug_allocator::{SlugAllocator, SlugTarget};
use crate::domain::entities::{ExpiryPolicy, NewPaste, Paste};
use crate::domain::repositories::PasteRepository;
use crate::error::AppError;
use crate::utils::slug::SlugPolicy;

/// Largest accepted paste body in bytes.
pub const MAX_PASTE_BYTES: usize = 1024 * 1024;

/// Input for creating a paste.
#[derive(Debug, Clone, Default)]
pub struct CreatePaste {
    pub content: String,
    pub hostname: Option<String>,
    pub password: Option<String>,
    /// `never`, `1hour`, `1day` or `1week`; absent means `never`.
    pub expires: Option<String>,
}

/// Service for pastes.
///
/// Expiry is enforced on read: an expired paste is deleted by the read that
/// discovers it, which answers 410; later reads answer 404.
pub struct PasteService {
    repository: Arc<dyn PasteRepository>,
    domains: Arc<DomainService>,
    allocator: SlugAllocator,
}

struct PendingPaste<'a> {
    repository: &'a dyn PasteRepository,
    content: &'a str,
    hostname: &'a str,
    password_hash: Option<&'a str>,
    expires_at: Option<chrono::DateTime<Utc>>,
}

#[async_trait]
impl SlugTarget for PendingPaste<'_> {
    type Output = Paste;

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        self.repository.slug_exists(slug).await
    }

    async fn insert_with_slug(&self, slug: String) -> Result<Paste, AppError> {
        self.repository
            .insert(NewPaste {
                slug,
                content: self.content.to_string(),
                hostname: self.hostname.to_string(),
                password_hash: self.password_hash.map(str::to_string),
                expires_at: self.expires_at,
            })
            .await
    }
}

impl PasteService {
    /// Creates a new paste service.
    pub fn new(repository: Arc<dyn PasteRepository>, domains: Arc<DomainService>) -> Self {
        Self {
            repository,
            domains,
            allocator: SlugAllocator::new(SlugPolicy::PASTE),
        }
    }

    /// Stores a paste under a freshly allocated slug.
    ///
    /// The expiry policy is resolved against the server clock here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for empty, oversized or NUL-bearing
    /// content, an unknown expiry policy or an unknown hostname.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_paste(&self, input: CreatePaste) -> Result<Paste, AppError> {
        if input.content.trim().is_empty() {
            return Err(AppError::bad_request("Content is required", json!({})));
        }
        if input.content.contains('\0') {
            return Err(AppError::bad_request(
                "Content must not contain NUL characters",
                json!({}),
            ));
        }
        if input.content.len() > MAX_PASTE_BYTES {
            return Err(AppError::bad_request(
                "Content is too large",
                json!({ "max_bytes": MAX_PASTE_BYTES, "provided": input.content.len() }),
            ));
        }

        let policy = ExpiryPolicy::parse(input.expires.as_deref()).ok_or_else(|| {
            AppError::bad_request(
                "Invalid expiry",
                json!({ "expires": input.expires, "allowed": ["never", "1hour", "1day", "1week"] }),
            )
        })?;

        let hostname = self
            .domains
            .resolve_hostname(input.hostname.as_deref())
            .await?;

        let password_hash = match input.password.as_deref() {
            Some(p) if !p.is_empty() => Some(hash_password_in_background(p).await?),
            _ => None,
        };

        let pending = PendingPaste {
            repository: self.repository.as_ref(),
            content: &input.content,
            hostname: &hostname,
            password_hash: password_hash.as_deref(),
            expires_at: policy.expires_at(Utc::now()),
        };

        let paste = self.allocator.allocate(&pending, None).await?;

        tracing::info!(
            slug = %paste.slug,
            hostname = %paste.hostname,
            expires_at = ?paste.expires_at,
            protected = paste.is_protected(),
            "Paste created"
        );

        Ok(paste)
    }

    /// Loads a live paste, deleting it if it has expired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no paste has that slug.
    /// Returns [`AppError::Gone`] if it had expired (and is now deleted).
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn read_paste(&self, slug: &str) -> Result<Paste, AppError> {
        let paste = self
            .repository
            .find(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Paste not found", json!({ "slug": slug })))?;

        if paste.is_expired() {
            self.repository.delete(slug).await?;
            tracing::info!(slug = %slug, expires_at = ?paste.expires_at, "Expired paste deleted on read");
            return Err(AppError::gone("Paste has expired", json!({ "slug": slug })));
        }

        Ok(paste)
    }

    /// Returns the paste for the public API, which carries no password.
    ///
    /// # Errors
    ///
    /// As [`Self::read_paste`], plus [`AppError::Forbidden`] if the paste is
    /// password protected.
    pub async fn get_paste(&self, slug: &str) -> Result<Paste, AppError> {
        let paste = self.read_paste(slug).await?;

        if paste.is_protected() {
            return Err(AppError::forbidden(
                "Paste is password protected",
                json!({ "slug": slug }),
            ));
        }

        Ok(paste)
    }

    /// Returns a paste after checking the visitor's password, if it has one.
    ///
    /// # Errors
    ///
    /// As [`Self::read_paste`], plus [`AppError::Unauthorized`] for a wrong
    /// password.
    pub async fn unlock_paste(&self, slug: &str, password: &str) -> Result<Paste, AppError> {
        let paste = self.read_paste(slug).await?;

        if let Some(ref hash) = paste.password_hash
            && !verify_password_in_background(password, hash).await?
        {
            return Err(AppError::unauthorized(
                "Incorrect password",
                json!({ "slug": slug }),
            ));
        }

        Ok(paste)
    }

    /// Lists all pastes, newest first, including expired ones not yet purged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_pastes(&self) -> Result<Vec<Paste>, AppError> {
        self.repository.list().await
    }

    /// Deletes a paste.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no paste has that slug.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_paste(&self, slug: &str) -> Result<(), AppError> {
        if !self.repository.delete(slug).await? {
            return Err(AppError::not_found("Paste not found", json!({ "slug": slug })));
        }

        tracing::info!(slug = %slug, "Paste deleted");
        Ok(())
    }

    /// Deletes every expired paste and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let removed = self.repository.purge_expired(Utc::now()).await?;
        tracing::info!(removed, "Expired pastes purged");
        Ok(removed)
    }

    /// Counts all pastes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_pastes(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}
