//! DTOs for paste endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::CreatePaste;
use crate::domain::entities::Paste;

/// Request body for `POST /api/create-paste`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePasteRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub hostname: Option<String>,

    pub password: Option<String>,

    /// One of `never`, `1hour`, `1day`, `1week`.
    pub expires: Option<String>,
}

impl From<CreatePasteRequest> for CreatePaste {
    fn from(r: CreatePasteRequest) -> Self {
        CreatePaste {
            content: r.content,
            hostname: r.hostname,
            password: r.password,
            expires: r.expires,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePasteResponse {
    pub paste_url: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct PasteContentResponse {
    pub content: String,
}

/// Paste list entry; content is not listed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteSummary {
    pub slug: String,
    pub hostname: String,
    pub paste_url: String,
    pub has_password: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_expired: bool,
}

impl From<Paste> for PasteSummary {
    fn from(p: Paste) -> Self {
        Self {
            paste_url: p.paste_url(),
            has_password: p.is_protected(),
            is_expired: p.is_expired(),
            slug: p.slug,
            hostname: p.hostname,
            expires_at: p.expires_at,
            created_at: p.created_at,
        }
    }
}
