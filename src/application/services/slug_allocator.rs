//! Collision-free slug allocation with bounded retries.
//!
//! The existence pre-check only saves a round trip; uniqueness is decided by
//! the store's primary key. A unique violation on insert is treated as a
//! collision and retried with a fresh candidate.

use async_trait::async_trait;
use serde_json::json;

use crate::error::AppError;
use crate::utils::slug::{SlugPolicy, generate_slug, is_reserved, validate_custom_slug};

/// Attempts made at each candidate length.
pub const ATTEMPTS_PER_LENGTH: usize = 20;

/// Extra characters used after the base length is exhausted.
pub const FALLBACK_EXTRA_LENGTH: usize = 2;

/// A namespace that slugs are allocated into, bound to the record being created.
#[async_trait]
pub trait SlugTarget: Send + Sync {
    type Output: Send;

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;

    /// Inserts the pending record under `slug`.
    ///
    /// Must return [`AppError::Conflict`] when the slug was taken concurrently.
    async fn insert_with_slug(&self, slug: String) -> Result<Self::Output, AppError>;
}

/// Allocates slugs for one namespace.
#[derive(Debug, Clone, Copy)]
pub struct SlugAllocator {
    policy: SlugPolicy,
}

impl SlugAllocator {
    pub fn new(policy: SlugPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SlugPolicy {
        self.policy
    }

    /// Inserts the target's record under a unique slug.
    ///
    /// A custom slug is validated and used verbatim. Without one, random
    /// candidates are drawn: [`ATTEMPTS_PER_LENGTH`] at the base length, then
    /// as many at base length + [`FALLBACK_EXTRA_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid custom slug.
    /// Returns [`AppError::Conflict`] if a custom slug is taken.
    /// Returns [`AppError::Internal`] once every attempt collided.
    pub async fn allocate<T>(&self, target: &T, custom: Option<&str>) -> Result<T::Output, AppError>
    where
        T: SlugTarget + ?Sized,
    {
        if let Some(slug) = custom {
            return self.allocate_custom(target, slug).await;
        }

        let lengths = [self.policy.length, self.policy.length + FALLBACK_EXTRA_LENGTH];

        for length in lengths {
            for attempt in 1..=ATTEMPTS_PER_LENGTH {
                let candidate = generate_slug(self.policy.alphabet, length);

                if is_reserved(&candidate) || target.slug_exists(&candidate).await? {
                    tracing::debug!(length, attempt, "Slug candidate already taken");
                    continue;
                }

                match target.insert_with_slug(candidate).await {
                    Ok(record) => return Ok(record),
                    Err(e) if e.is_conflict() => {
                        tracing::warn!(length, attempt, "Slug collided on insert, retrying");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::error!(
            base_length = self.policy.length,
            attempts = ATTEMPTS_PER_LENGTH * 2,
            "Slug space exhausted"
        );

        Err(AppError::internal(
            "Could not allocate a unique slug",
            json!({ "reason": "resource exhausted", "attempts": ATTEMPTS_PER_LENGTH * 2 }),
        ))
    }

    async fn allocate_custom<T>(&self, target: &T, slug: &str) -> Result<T::Output, AppError>
    where
        T: SlugTarget + ?Sized,
    {
        validate_custom_slug(slug)?;

        let taken = || AppError::conflict("Slug already in use", json!({ "slug": slug }));

        if target.slug_exists(slug).await? {
            return Err(taken());
        }

        target
            .insert_with_slug(slug.to_string())
            .await
            .map_err(|e| if e.is_conflict() { taken() } else { e })
    }
}
