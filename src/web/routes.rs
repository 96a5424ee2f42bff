//! Browser-facing route configuration.

use std::path::PathBuf;

use axum::{Router, routing::get};
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;
use crate::web::handlers::{
    password_prompt_handler, redirect_handler, submit_password_handler, unlock_paste_handler,
    view_paste_handler,
};

/// Public browser routes.
///
/// # Endpoints
///
/// - `GET /`, `/index`, `/login`, `/dashboard`, `/details/{slug}` - Dashboard shell (`index.html`)
/// - `GET /favicon.ico`, `/assets/*`, `/static/*` - Dashboard bundle files
/// - `GET|POST /p/{slug}` - Paste view
/// - `GET|POST /password` - Password prompt for protected links
/// - `GET /{slug}` - Short link redirect
pub fn router(state: &AppState) -> Router<AppState> {
    let static_dir = PathBuf::from(&state.settings.static_dir);
    let index = ServeFile::new(static_dir.join("index.html"));

    Router::new()
        .route_service("/", index.clone())
        .route_service("/index", index.clone())
        .route_service("/login", index.clone())
        .route_service("/dashboard", index.clone())
        .route_service("/details/{slug}", index)
        .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
        .nest_service("/assets", ServeDir::new(static_dir.join("assets")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .route(
            "/p/{slug}",
            get(view_paste_handler).post(unlock_paste_handler),
        )
        .route(
            "/password",
            get(password_prompt_handler).post(submit_password_handler),
        )
        .route("/{slug}", get(redirect_handler))
}
