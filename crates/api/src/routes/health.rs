//! Health and landing endpoints. No authentication.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::state::AppState;

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Landing message.
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Hotel Booking API is running",
        "documentation": "Visit /health for health check",
    }))
}

/// Liveness health check endpoint.
///
/// Reports `UP` if the server is running. Does not check dependencies.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "hotel-booking-api",
    }))
}

/// Readiness health check endpoint.
///
/// Pings storage before reporting `UP`.
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.repos().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "UP" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "DOWN" })),
            )
        }
    }
}
