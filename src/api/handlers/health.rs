//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Storage readable
/// - **503 Service Unavailable**: Storage cannot be read
///
/// # Components Checked
///
/// 1. **Storage**: Reads every stored link
/// 2. **Queue**: Reports pending task count and whether a drain is running
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "12 links stored" },
///     "queue": { "status": "ok", "message": "0 pending, idle" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;
    let queue_check = check_queue(&state);

    let all_healthy = storage_check.status == "ok" && queue_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
            queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.repository.find_all().await {
        Ok(links) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{} links stored", links.len())),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Storage error: {}", e)),
        },
    }
}

/// A stopped queue no longer drains and is reported as an error.
fn check_queue(state: &AppState) -> CheckStatus {
    let processor = state.runner.processor();
    let pending = processor.pending_count();

    if processor.is_stopped() {
        CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Queue stopped with {pending} pending")),
        }
    } else {
        let activity = if processor.is_processing() { "running" } else { "idle" };
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{pending} pending, {activity}")),
        }
    }
}
