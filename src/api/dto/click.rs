//! DTOs for click ledger entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Click;

/// One row of `GET /api/link-details`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickResponse {
    pub id: i64,
    pub link_slug: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl From<Click> for ClickResponse {
    fn from(c: Click) -> Self {
        Self {
            id: c.id,
            link_slug: c.link_slug,
            ip_address: c.ip_address,
            user_agent: c.user_agent,
            referrer: c.referrer,
            clicked_at: c.clicked_at,
        }
    }
}
