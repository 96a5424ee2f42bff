//! Repository trait for the domain registry.

use crate::domain::entities::{Domain, DomainRemoval};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for registered hostnames.
///
/// Hostnames passed in are expected to be normalized already
/// (see [`crate::domain::entities::normalize_hostname`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDomainRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_domain.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Registers a hostname.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the hostname is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, hostname: &str) -> Result<Domain, AppError>;

    /// Finds a registered hostname.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, hostname: &str) -> Result<Option<Domain>, AppError>;

    /// Lists all domains ordered by `added_at` ascending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Domain>, AppError>;

    /// Returns the earliest-added domain, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn primary(&self) -> Result<Option<Domain>, AppError>;

    /// Removes a hostname unless it is the last one registered.
    ///
    /// The count check and the delete run in one transaction holding row
    /// locks on every domain, so two concurrent removals cannot both pass
    /// the floor check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn remove(&self, hostname: &str) -> Result<DomainRemoval, AppError>;
}
