//! Public short link resolution.

use std::path::Path as FsPath;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{Method, StatusCode, header::LOCATION},
    response::{IntoResponse, Redirect, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::api::extractors::{Client, RequestHost};
use crate::application::services::Resolution;
use crate::state::AppState;

/// Resolves `/{slug}` on the request host.
///
/// # Endpoint
///
/// `GET /{slug}` (HEAD answers the same but logs no click)
///
/// # Responses
///
/// - **308 Permanent Redirect** to the destination, after the click is logged
/// - **302 Found** to `/password?slug=<slug>` for protected links, no click
/// - **404 Not Found** (plain text) for an unknown host or slug
/// - the dashboard shell for reserved paths
pub async fn redirect_handler(
    State(state): State<AppState>,
    RequestHost(host): RequestHost,
    Client(client): Client,
    Path(slug): Path<String>,
    request: Request,
) -> Response {
    let redirects = match state.redirects() {
        Ok(r) => r,
        Err(e) => return plain_error(e.status()),
    };

    let resolved = if request.method() == Method::HEAD {
        redirects.preview(host.as_deref(), &slug).await
    } else {
        redirects.resolve(host.as_deref(), &slug, client).await
    };

    match resolved {
        Ok(Resolution::Redirect(url)) => Redirect::permanent(&url).into_response(),
        Ok(Resolution::PasswordPrompt(slug)) => {
            let encoded: String = url::form_urlencoded::byte_serialize(slug.as_bytes()).collect();
            (
                StatusCode::FOUND,
                [(LOCATION, format!("/password?slug={encoded}"))],
            )
                .into_response()
        }
        Ok(Resolution::Dashboard) => serve_dashboard(&state.settings.static_dir, request).await,
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!(message = %e.message(), details = %e.details(), "Redirect failed");
            }
            plain_error(e.status())
        }
    }
}

/// Serves `index.html` from the dashboard bundle.
pub async fn serve_dashboard(static_dir: &str, request: Request) -> Response {
    let index = FsPath::new(static_dir).join("index.html");

    match ServeFile::new(index).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

fn plain_error(status: StatusCode) -> Response {
    let text = if status.is_server_error() {
        "Internal server error"
    } else {
        "Not found"
    };
    (status, text).into_response()
}
