//! Handler for the health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: datastore reachable and admin secret configured
/// - **503 Service Unavailable**: otherwise
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "admin_secret": { "status": "ok", "message": "Configured" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let admin_secret = check_admin_secret(&state);

    let healthy = database.is_ok() && admin_secret.is_ok();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            admin_secret,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    let Some(pool) = state.pool() else {
        return CheckStatus::error("Not configured");
    };

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => {
            tracing::error!(error = %e, "Health check query failed");
            CheckStatus::error("Unreachable")
        }
    }
}

fn check_admin_secret(state: &AppState) -> CheckStatus {
    if state.auth.is_configured() {
        CheckStatus::ok("Configured")
    } else {
        CheckStatus::error("Not configured")
    }
}
