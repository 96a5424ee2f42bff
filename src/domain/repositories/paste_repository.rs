//! Repository trait for paste data access.

use crate::domain::entities::{NewPaste, Paste};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for managing pastes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPasteRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasteRepository: Send + Sync {
    /// Inserts a paste with an already chosen slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_paste: NewPaste) -> Result<Paste, AppError>;

    /// Checks whether a slug is in use.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;

    /// Finds a paste by slug, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, slug: &str) -> Result<Option<Paste>, AppError>;

    /// Lists all pastes, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Paste>, AppError>;

    /// Deletes a paste. Returns `false` if no paste had that slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, slug: &str) -> Result<bool, AppError>;

    /// Deletes every paste whose expiry is at or before `now`.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts all pastes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
