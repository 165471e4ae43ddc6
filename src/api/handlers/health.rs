//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::{CheckStatus, HealthResponse};
use crate::state::AppState;

/// Returns service health status.
///
/// # Endpoint
///
/// `GET /health`
///
/// Always `200 OK`: the registry lives in process memory, so a running process
/// can serve. A stopped telemetry worker only marks the status `degraded`.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "links": 42,
///   "telemetry_queue": { "status": "ok", "message": "Capacity: 1000" }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let telemetry_queue = check_telemetry_queue(&state);
    let healthy = telemetry_queue.status != "error";

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        links: state.link_registry.count().await,
        telemetry_queue,
    })
}

/// Checks whether telemetry entries can still be queued.
fn check_telemetry_queue(state: &AppState) -> CheckStatus {
    match state.telemetry.capacity() {
        None => CheckStatus {
            status: "disabled".to_string(),
            message: None,
        },
        Some(_) if state.telemetry.is_closed() => CheckStatus {
            status: "error".to_string(),
            message: Some("Telemetry worker stopped".to_string()),
        },
        Some(capacity) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Capacity: {}", capacity)),
        },
    }
}
