//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short link.
///
/// `slug` is unique across every link regardless of hostname; the hostname
/// only decides which domain the short URL is printed with.
#[derive(Debug, Clone)]
pub struct Link {
    pub slug: String,
    pub url: String,
    pub hostname: String,
    pub password_hash: Option<String>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if visitors must pass the password gate before redirecting.
    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Short URL for this link, always over HTTPS.
    pub fn short_url(&self) -> String {
        short_url(&self.hostname, &self.slug)
    }
}

pub fn short_url(hostname: &str, slug: &str) -> String {
    format!("https://{}/{}", hostname.trim_end_matches('/'), slug)
}

/// Input data for inserting a link once a slug has been chosen.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: String,
    pub url: String,
    pub hostname: String,
    pub password_hash: Option<String>,
}

/// How an update treats the stored password.
///
/// An absent field keeps the current hash, an empty value clears it and
/// anything else replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordChange {
    Keep,
    Clear,
    Set(String),
}

impl PasswordChange {
    /// Builds the change from the raw request field.
    ///
    /// `None` means the field was absent; `Some(None)` (JSON `null`) and
    /// `Some(Some(""))` both clear.
    pub fn from_field(field: Option<Option<String>>) -> Self {
        match field {
            None => PasswordChange::Keep,
            Some(None) => PasswordChange::Clear,
            Some(Some(p)) if p.is_empty() => PasswordChange::Clear,
            Some(Some(p)) => PasswordChange::Set(p),
        }
    }
}

/// Update applied to an existing link, with the password already hashed.
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub url: String,
    pub new_slug: Option<String>,
    /// `None` leaves the hash untouched; `Some(None)` clears it.
    pub password_hash: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(password_hash: Option<&str>) -> Link {
        Link {
            slug: "abc123".to_string(),
            url: "https://example.com".to_string(),
            hostname: "s.example.com".to_string(),
            password_hash: password_hash.map(str::to_string),
            click_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_url() {
        assert_eq!(link(None).short_url(), "https://s.example.com/abc123");
        assert_eq!(short_url("s.example.com/", "x"), "https://s.example.com/x");
    }

    #[test]
    fn test_is_protected() {
        assert!(!link(None).is_protected());
        assert!(link(Some("$argon2id$...")).is_protected());
    }

    #[test]
    fn test_password_change_from_field() {
        assert_eq!(PasswordChange::from_field(None), PasswordChange::Keep);
        assert_eq!(PasswordChange::from_field(Some(None)), PasswordChange::Clear);
        assert_eq!(
            PasswordChange::from_field(Some(Some(String::new()))),
            PasswordChange::Clear
        );
        assert_eq!(
            PasswordChange::from_field(Some(Some("x".to_string()))),
            PasswordChange::Set("x".to_string())
        );
    }
}
