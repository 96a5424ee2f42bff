//! Handlers for domain management endpoints.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::MessageResponse;
use crate::api::dto::domain::{DomainResponse, HostnameRequest};
use crate::api::extractors::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

/// Lists registered domains, oldest first.
///
/// # Endpoint
///
/// `GET /api/domains`
pub async fn list_domains_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<DomainResponse>>, AppError> {
    let domains = state.domains()?.list().await?;

    Ok(Json(domains.into_iter().map(DomainResponse::from).collect()))
}

/// Registers a hostname.
///
/// # Endpoint
///
/// `POST /api/add-domain`
///
/// # Errors
///
/// Returns 400 if the hostname is missing or malformed.
/// Returns 409 if it is already registered.
pub async fn add_domain_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<HostnameRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    payload.validate()?;

    state.domains()?.add(&payload.hostname).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Domain added successfully.")),
    ))
}

/// Removes a hostname.
///
/// # Endpoint
///
/// `DELETE /api/domains`
///
/// # Errors
///
/// Returns 400 if the hostname is missing or is the last registered domain.
/// Returns 404 if it is not registered.
pub async fn remove_domain_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<HostnameRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state.domains()?.remove(&payload.hostname).await?;

    Ok(Json(MessageResponse::new("Domain removed successfully.")))
}
