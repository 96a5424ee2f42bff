//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkUpdate, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a link with an already chosen slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is taken. The slug allocator
    /// relies on this to detect races that slipped past its pre-check.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Checks whether a slug is in use.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;

    /// Finds a link by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Lists all links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Link>, AppError>;

    /// Applies an update to the link currently stored under `slug`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` with the updated row
    /// - `Ok(None)` if no link has that slug
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `new_slug` belongs to another link.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, slug: &str, update: LinkUpdate) -> Result<Option<Link>, AppError>;

    /// Deletes a link and, through the foreign key, its clicks.
    ///
    /// Returns `false` if no link had that slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, slug: &str) -> Result<bool, AppError>;

    /// Counts all links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
