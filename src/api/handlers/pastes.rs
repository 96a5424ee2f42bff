//! Handlers for paste endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::MessageResponse;
use crate::api::dto::link::{SlugQuery, SlugRequest};
use crate::api::dto::paste::{
    CreatePasteRequest, CreatePasteResponse, PasteContentResponse, PasteSummary,
};
use crate::api::extractors::{ApiJson, ApiQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a paste.
///
/// # Endpoint
///
/// `POST /api/create-paste`
///
/// # Request Body
///
/// ```json
/// {
///   "content": "# Notes",
///   "hostname": "s.example.com",  // optional
///   "password": "secret",         // optional
///   "expires": "1day"             // never | 1hour | 1day | 1week
/// }
/// ```
pub async fn create_paste_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreatePasteRequest>,
) -> Result<Json<CreatePasteResponse>, AppError> {
    payload.validate()?;

    let paste = state.pastes()?.create_paste(payload.into()).await?;

    Ok(Json(CreatePasteResponse {
        paste_url: paste.paste_url(),
        slug: paste.slug,
    }))
}

/// Lists pastes, newest first, without their content.
///
/// # Endpoint
///
/// `GET /api/pastes`
pub async fn list_pastes_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<PasteSummary>>, AppError> {
    let pastes = state.pastes()?.list_pastes().await?;

    Ok(Json(pastes.into_iter().map(PasteSummary::from).collect()))
}

/// Deletes a paste.
///
/// # Endpoint
///
/// `DELETE /api/pastes`
pub async fn delete_paste_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SlugRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state.pastes()?.delete_paste(&payload.slug).await?;

    Ok(Json(MessageResponse::new("Paste deleted successfully.")))
}

/// Returns the content of an unprotected paste.
///
/// # Endpoint
///
/// `GET /api/get-paste?slug=<slug>` (public)
///
/// # Errors
///
/// - 400 without a slug
/// - 404 unknown paste
/// - 410 expired (the paste is deleted by this read)
/// - 403 password protected
pub async fn get_paste_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SlugQuery>,
) -> Result<Json<PasteContentResponse>, AppError> {
    query.validate()?;

    let paste = state.pastes()?.get_paste(&query.slug).await?;

    Ok(Json(PasteContentResponse {
        content: paste.content,
    }))
}
