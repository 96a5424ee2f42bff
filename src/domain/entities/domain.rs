//! Domain entity representing a hostname allowed to serve short links.

use chrono::{DateTime, Utc};

/// A registered hostname.
///
/// Hostnames are stored lower-cased; the earliest-added domain is the primary
/// domain used whenever an operation does not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub hostname: String,
    pub added_at: DateTime<Utc>,
}

impl Domain {
    pub fn new(hostname: String, added_at: DateTime<Utc>) -> Self {
        Self { hostname, added_at }
    }
}

/// Outcome of a domain removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainRemoval {
    Deleted,
    NotFound,
    /// Refused because the domain is the only one left.
    LastDomain,
}

/// Lower-cases and trims a hostname so storage and comparison agree.
pub fn normalize_hostname(hostname: &str) -> String {
    hostname.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hostname() {
        assert_eq!(normalize_hostname("S.Example.COM"), "s.example.com");
        assert_eq!(normalize_hostname("  go.link. "), "go.link");
        assert_eq!(normalize_hostname("already.lower"), "already.lower");
    }

    #[test]
    fn test_domain_creation() {
        let now = Utc::now();
        let domain = Domain::new("s.example.com".to_string(), now);

        assert_eq!(domain.hostname, "s.example.com");
        assert_eq!(domain.added_at, now);
    }
}
