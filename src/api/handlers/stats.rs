//! Handler for link statistics.

use axum::{Json, extract::State};

use crate::application::services::LinkStatistics;
use crate::error::AppError;
use crate::state::AppState;

/// Counts stored links by status and by tag.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// # Response
///
/// ```json
/// {
///   "total": 3,
///   "byStatus": { "completed": 2, "failed": 1, "pending": 0, "processing": 0 },
///   "byTag": { "rust": 2 }
/// }
/// ```
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<LinkStatistics>, AppError> {
    Ok(Json(state.link_service.statistics().await?))
}
