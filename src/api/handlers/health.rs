//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Reports whether the service can reach its link store.
///
/// # Endpoint
///
/// `GET /healthz`
///
/// # Response Codes
///
/// - **200 OK**: Store reachable
/// - **500 Internal Server Error**: Store unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "message": "Service is healthy",
///   "timestamp": "2025-01-01T12:00:00Z",
///   "database": "connected"
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.link_service.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse::unhealthy()),
            )
        }
    }
}
