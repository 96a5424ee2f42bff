//! Slug generation and validation.
//!
//! Generated slugs are drawn from a per-namespace alphabet with the
//! thread-local, OS-seeded RNG. Custom slugs share one validation rule set
//! for links and pastes.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

const ALNUM_MIXED: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALNUM_LOWER: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Characters a custom slug may contain.
static CUSTOM_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Maximum length of a custom slug.
pub const MAX_CUSTOM_SLUG_LEN: usize = 64;

/// Path tokens that cannot be used as slugs because routes already own them.
pub const RESERVED_SLUGS: &[&str] = &[
    "api",
    "p",
    "password",
    "login",
    "dashboard",
    "details",
    "static",
    "health",
    "index",
    "favicon.ico",
    "assets",
];

/// Alphabet and base length used when generating slugs for one namespace.
#[derive(Debug, Clone, Copy)]
pub struct SlugPolicy {
    pub alphabet: &'static [u8],
    pub length: usize,
}

impl SlugPolicy {
    /// Links: `0-9a-zA-Z`, 7 characters.
    pub const LINK: SlugPolicy = SlugPolicy {
        alphabet: ALNUM_MIXED,
        length: 7,
    };

    /// Pastes: `0-9a-z`, 10 characters.
    pub const PASTE: SlugPolicy = SlugPolicy {
        alphabet: ALNUM_LOWER,
        length: 10,
    };
}

/// Draws a random slug of `length` characters from `alphabet`.
pub fn generate_slug(alphabet: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Returns true if `slug` names a route rather than a resource.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(slug))
}

/// Validates a caller-chosen slug.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
/// - Cannot be a reserved path token
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > MAX_CUSTOM_SLUG_LEN {
        return Err(AppError::bad_request(
            "Custom slug must be 1-64 characters",
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !CUSTOM_SLUG_REGEX.is_match(slug) {
        return Err(AppError::bad_request(
            "Custom slug can only contain letters, digits, '_' and '-'",
            json!({ "slug": slug }),
        ));
    }

    if is_reserved(slug) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}
