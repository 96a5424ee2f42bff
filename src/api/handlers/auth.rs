//! Handlers for the public credential endpoints.

use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::MessageResponse;
use crate::api::dto::auth::{LoginRequest, VerifyPasswordRequest, VerifyPasswordResponse};
use crate::api::extractors::{ApiJson, Client};
use crate::api::middleware::auth::{clear_session_cookie_header, session_cookie_header};
use crate::application::services::AuthService;
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges the admin secret for a session cookie.
///
/// # Endpoint
///
/// `POST /api/login`
///
/// # Request Body
///
/// ```json
/// { "password": "<admin secret>", "rememberMe": false }
/// ```
///
/// The session lasts 24 hours, or 30 days with `rememberMe`.
///
/// # Errors
///
/// Returns 400 without a password, 401 for a wrong one and 500 when no admin
/// secret is configured.
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    if !state.auth.authenticate_admin(&payload.password)? {
        tracing::warn!("Admin login rejected");
        return Err(AppError::unauthorized("Invalid password.", json!({})));
    }

    let ttl = AuthService::session_ttl(payload.remember_me);
    let token = state.auth.issue_session_token(ttl)?;
    let cookie = session_cookie_header(&token, ttl.num_seconds(), state.settings.cookie_secure);

    tracing::info!(remember_me = payload.remember_me, "Admin session issued");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(MessageResponse::new("Login successful.")),
    )
        .into_response())
}

/// Clears the session cookie.
///
/// # Endpoint
///
/// `POST /api/logout`
pub async fn logout_handler(State(state): State<AppState>) -> Response {
    (
        [(SET_COOKIE, clear_session_cookie_header(state.settings.cookie_secure))],
        Json(MessageResponse::new("Logged out.")),
    )
        .into_response()
}

/// Unlocks a password-protected link.
///
/// # Endpoint
///
/// `POST /api/verify-password`
///
/// On success the click is logged and the destination returned; the
/// caller performs the navigation.
///
/// # Errors
///
/// Returns 400 for missing fields, 404 if the link does not exist or is not
/// protected, 401 for a wrong password.
pub async fn verify_password_handler(
    State(state): State<AppState>,
    Client(client): Client,
    ApiJson(payload): ApiJson<VerifyPasswordRequest>,
) -> Result<Json<VerifyPasswordResponse>, AppError> {
    payload.validate()?;

    let destination_url = state
        .redirects()?
        .unlock(&payload.slug, &payload.password, client)
        .await?;

    Ok(Json(VerifyPasswordResponse { destination_url }))
}
