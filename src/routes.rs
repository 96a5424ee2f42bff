//! Top-level router combining API and browser routes.
//!
//! # Route Structure
//!
//! - `/api/*`       - JSON API, see [`crate::api::routes::ROUTE_TABLE`]
//! - `GET /health`  - Health check (public)
//! - `GET /{slug}`  - Short link redirect (public)
//! - `/p/{slug}`, `/password` - Paste view and password prompt (public)
//! - everything else - Dashboard shell and its static bundle
//!
//! # Middleware
//!
//! - **Tracing** - One span per request with status and latency
//! - **Authentication** - Bearer secret or session cookie on admin API routes
//! - **Rate limiting** - Per-IP limits on login and password verification
//! - **Path normalization** - Trailing slash handling

use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::health_handler;
use crate::state::AppState;
use crate::web;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::router(&state))
        .route("/health", get(health_handler))
        .merge(web::routes::router(&state))
        .with_state(state)
        .layer(api::middleware::tracing::layer())
}

/// [`router`] with trailing slashes trimmed before routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
