//! Paste entity representing a stored text blob.

use chrono::{DateTime, Duration, Utc};

/// A stored paste.
#[derive(Debug, Clone)]
pub struct Paste {
    pub slug: String,
    pub content: String,
    pub hostname: String,
    pub password_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Paste {
    /// Returns true once `expires_at` has passed.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn paste_url(&self) -> String {
        paste_url(&self.hostname, &self.slug)
    }
}

pub fn paste_url(hostname: &str, slug: &str) -> String {
    format!("https://{}/p/{}", hostname.trim_end_matches('/'), slug)
}

/// Input data for inserting a paste once a slug has been chosen.
#[derive(Debug, Clone)]
pub struct NewPaste {
    pub slug: String,
    pub content: String,
    pub hostname: String,
    pub password_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Lifetime chosen for a paste at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    Never,
    OneHour,
    OneDay,
    OneWeek,
}

impl ExpiryPolicy {
    /// Parses the request token; an absent value means `Never`.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("never") => Some(ExpiryPolicy::Never),
            Some("1hour") => Some(ExpiryPolicy::OneHour),
            Some("1day") => Some(ExpiryPolicy::OneDay),
            Some("1week") => Some(ExpiryPolicy::OneWeek),
            Some(_) => None,
        }
    }

    /// Resolves the policy to an absolute timestamp relative to `now`.
    pub fn expires_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ExpiryPolicy::Never => None,
            ExpiryPolicy::OneHour => Some(now + Duration::hours(1)),
            ExpiryPolicy::OneDay => Some(now + Duration::days(1)),
            ExpiryPolicy::OneWeek => Some(now + Duration::weeks(1)),
        }
    }
}
