//! Click entity representing a single resolved redirect.

use chrono::{DateTime, Utc};

/// One row of the click ledger.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub link_slug: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

/// Input data for recording a click.
///
/// All client metadata is optional; the timestamp is set by the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClick {
    pub link_slug: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// Request metadata captured for analytics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl ClientInfo {
    pub fn into_click(self, link_slug: impl Into<String>) -> NewClick {
        NewClick {
            link_slug: link_slug.into(),
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            referrer: self.referrer,
        }
    }
}
