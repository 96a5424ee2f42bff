//! DTOs for domain management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Domain;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResponse {
    pub hostname: String,
    pub added_at: DateTime<Utc>,
}

impl From<Domain> for DomainResponse {
    fn from(d: Domain) -> Self {
        Self {
            hostname: d.hostname,
            added_at: d.added_at,
        }
    }
}

/// Body of `POST /api/add-domain` and `DELETE /api/domains`.
#[derive(Debug, Deserialize, Validate)]
pub struct HostnameRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 253, message = "Hostname is required"))]
    pub hostname: String,
}
