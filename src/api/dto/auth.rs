//! DTOs for login and per-link password verification.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Extends the session from 24 hours to 30 days.
    #[serde(default)]
    pub remember_me: bool,
}

/// Request body for `POST /api/verify-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPasswordResponse {
    pub destination_url: String,
}
