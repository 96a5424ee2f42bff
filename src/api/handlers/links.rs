//! Handlers for short link endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::MessageResponse;
use crate::api::dto::click::ClickResponse;
use crate::api::dto::link::{
    LinkResponse, ShortenRequest, ShortenResponse, SlugQuery, SlugRequest, UpdateLinkRequest,
};
use crate::api::extractors::{ApiJson, ApiQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://long.example.com/x",
///   "hostname": "s.example.com",   // optional, primary domain otherwise
///   "slug": "my-link",             // optional
///   "password": "secret"           // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 for an invalid URL, slug or hostname.
/// Returns 409 if the custom slug is taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let link = state.links()?.create_link(payload.into()).await?;

    Ok(Json(ShortenResponse {
        short_url: link.short_url(),
        slug: link.slug,
    }))
}

/// Lists all links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.links()?.list_links().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Updates destination, slug and password of a link.
///
/// # Endpoint
///
/// `PUT /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "originalSlug": "abc1234",
///   "destinationUrl": "https://new.example.com",
///   "newSlug": "renamed",   // optional
///   "password": ""          // optional: absent keeps, "" or null clears
/// }
/// ```
///
/// # Errors
///
/// Returns 400 for invalid input, 404 for an unknown link, 409 if the new
/// slug is taken.
pub async fn update_link_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.links()?.update_link(payload.into()).await?;

    Ok(Json(LinkResponse::from(link)))
}

/// Deletes a link and, by cascade, its clicks.
///
/// # Endpoint
///
/// `DELETE /api/links`
pub async fn delete_link_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SlugRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state.links()?.delete_link(&payload.slug).await?;

    Ok(Json(MessageResponse::new("Link deleted successfully.")))
}

/// Lists the clicks of one link, newest first.
///
/// # Endpoint
///
/// `GET /api/link-details?slug=<slug>`
///
/// # Errors
///
/// Returns 400 without a slug and 404 for an unknown link.
pub async fn link_details_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SlugQuery>,
) -> Result<Json<Vec<ClickResponse>>, AppError> {
    query.validate()?;

    let link = state.links()?.get_link(&query.slug).await?;
    let clicks = state.clicks()?.list_for_link(&link.slug).await?;

    Ok(Json(clicks.into_iter().map(ClickResponse::from).collect()))
}
