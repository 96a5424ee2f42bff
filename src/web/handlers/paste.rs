//! Paste view page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::domain::entities::Paste;
use crate::state::AppState;
use crate::web::error::PageError;

#[derive(Template, WebTemplate)]
#[template(path = "paste.html")]
struct PasteTemplate {
    slug: String,
    content: String,
    created_at: String,
    expires_at: Option<String>,
}

impl From<Paste> for PasteTemplate {
    fn from(p: Paste) -> Self {
        Self {
            slug: p.slug,
            content: p.content,
            created_at: p.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            expires_at: p
                .expires_at
                .map(|e| e.format("%Y-%m-%d %H:%M UTC").to_string()),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "paste_locked.html")]
struct LockedPasteTemplate {
    slug: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnlockForm {
    #[serde(default)]
    password: String,
}

/// Renders a paste, or a password form if it is protected.
///
/// # Endpoint
///
/// `GET /p/{slug}`
///
/// Content is HTML-escaped inside a `<pre>` block. Reading an expired paste
/// deletes it and renders 410; the next read renders 404.
pub async fn view_paste_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let paste = state.pastes()?.read_paste(&slug).await?;

    if paste.is_protected() {
        return Ok(LockedPasteTemplate {
            slug: paste.slug,
            error: None,
        }
        .into_response());
    }

    Ok(PasteTemplate::from(paste).into_response())
}

/// Checks the password of a protected paste and renders it.
///
/// # Endpoint
///
/// `POST /p/{slug}` with form field `password`
pub async fn unlock_paste_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<UnlockForm>,
) -> Result<Response, PageError> {
    match state.pastes()?.unlock_paste(&slug, &form.password).await {
        Ok(paste) => Ok(PasteTemplate::from(paste).into_response()),
        Err(e) if e.status() == StatusCode::UNAUTHORIZED => Ok((
            StatusCode::UNAUTHORIZED,
            LockedPasteTemplate {
                slug,
                error: Some("Incorrect password.".to_string()),
            },
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
