//! Password prompt for protected links.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::api::extractors::{ApiQuery, Client};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::error::PageError;

#[derive(Template, WebTemplate)]
#[template(path = "password.html")]
struct PasswordTemplate {
    slug: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    #[serde(default)]
    slug: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    slug: String,
    #[serde(default)]
    password: String,
}

/// Renders the password form.
///
/// # Endpoint
///
/// `GET /password?slug=<slug>`
pub async fn password_prompt_handler(
    ApiQuery(query): ApiQuery<PromptQuery>,
) -> Result<Response, PageError> {
    if query.slug.is_empty() {
        return Err(AppError::bad_request("A link slug is required.", json!({})).into());
    }

    Ok(PasswordTemplate {
        slug: query.slug,
        error: None,
    }
    .into_response())
}

/// Verifies the password, logs the click and sends the visitor on.
///
/// # Endpoint
///
/// `POST /password` with form fields `slug` and `password`
///
/// Answers `303 See Other` to the destination. A wrong password re-renders
/// the form with 401.
pub async fn submit_password_handler(
    State(state): State<AppState>,
    Client(client): Client,
    Form(form): Form<PasswordForm>,
) -> Result<Response, PageError> {
    if form.slug.is_empty() || form.password.is_empty() {
        return Err(AppError::bad_request("Slug and password are required.", json!({})).into());
    }

    match state
        .redirects()?
        .unlock(&form.slug, &form.password, client)
        .await
    {
        Ok(destination) => Ok(Redirect::to(&destination).into_response()),
        Err(e) if e.status() == StatusCode::UNAUTHORIZED => Ok((
            StatusCode::UNAUTHORIZED,
            PasswordTemplate {
                slug: form.slug,
                error: Some("Incorrect password.".to_string()),
            },
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
