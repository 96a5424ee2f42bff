//! DTOs for short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::application::services::{CreateLink, UpdateLink};
use crate::domain::entities::{Link, PasswordChange};

/// Request body for `POST /api/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    /// Custom slug; generated when absent or empty.
    pub slug: Option<String>,

    /// Registered hostname; the primary domain is used when absent.
    pub hostname: Option<String>,

    /// Protects the link when non-empty.
    pub password: Option<String>,
}

impl From<ShortenRequest> for CreateLink {
    fn from(r: ShortenRequest) -> Self {
        CreateLink {
            url: r.url,
            hostname: r.hostname,
            slug: r.slug.filter(|s| !s.trim().is_empty()),
            password: r.password,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub slug: String,
}

/// Request body for `PUT /api/links`.
///
/// # `password` semantics
///
/// - **Absent** → keep the stored password
/// - **`null` or `""`** → remove the password
/// - **Value** → replace the password
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Original slug is required"))]
    pub original_slug: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Destination URL is required"))]
    pub destination_url: String,

    pub new_slug: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub password: Option<Option<String>>,
}

impl From<UpdateLinkRequest> for UpdateLink {
    fn from(r: UpdateLinkRequest) -> Self {
        UpdateLink {
            original_slug: r.original_slug,
            url: r.destination_url,
            new_slug: r.new_slug,
            password: PasswordChange::from_field(r.password),
        }
    }
}

/// Body of `DELETE /api/links` and `DELETE /api/pastes`.
#[derive(Debug, Deserialize, Validate)]
pub struct SlugRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
}

/// Query of `GET /api/link-details` and `GET /api/get-paste`.
#[derive(Debug, Deserialize, Validate)]
pub struct SlugQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
}

/// Link list entry. The password hash is never serialized.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub slug: String,
    pub url: String,
    pub hostname: String,
    pub short_url: String,
    pub has_password: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            short_url: link.short_url(),
            has_password: link.is_protected(),
            slug: link.slug,
            url: link.url,
            hostname: link.hostname,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> UpdateLink {
        serde_json::from_value::<UpdateLinkRequest>(body).unwrap().into()
    }

    #[test]
    fn test_update_password_absent_null_empty_value() {
        let base = json!({ "originalSlug": "abc", "destinationUrl": "https://x.io" });

        assert_eq!(parse(base.clone()).password, PasswordChange::Keep);

        let mut with_null = base.clone();
        with_null["password"] = json!(null);
        assert_eq!(parse(with_null).password, PasswordChange::Clear);

        let mut with_empty = base.clone();
        with_empty["password"] = json!("");
        assert_eq!(parse(with_empty).password, PasswordChange::Clear);

        let mut with_value = base;
        with_value["password"] = json!("x");
        assert_eq!(
            parse(with_value).password,
            PasswordChange::Set("x".to_string())
        );
    }

    #[test]
    fn test_link_response_hides_hash() {
        let link = Link {
            slug: "abc1234".to_string(),
            url: "https://long.example.com/x".to_string(),
            hostname: "s.example.com".to_string(),
            password_hash: Some("$argon2id$v=19$secret".to_string()),
            click_count: 3,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(LinkResponse::from(link)).unwrap();

        assert_eq!(value["shortUrl"], "https://s.example.com/abc1234");
        assert_eq!(value["hasPassword"], true);
        assert_eq!(value["clickCount"], 3);
        assert!(!value.to_string().contains("argon2"));
    }
}
