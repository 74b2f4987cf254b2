//! Handler for batch processing of pending links.

use axum::{Json, extract::State};

use crate::application::services::BatchSummary;
use crate::error::AppError;
use crate::state::AppState;

/// Processes every pending link sequentially and returns per-link results.
///
/// # Endpoint
///
/// `POST /api/process-links`
///
/// # Batch Processing
///
/// Links are processed one at a time. A failing link is reported in its
/// result item and never aborts the batch, so this endpoint returns 200 even
/// when some links fail.
///
/// # Response
///
/// ```json
/// {
///   "processed": 2,
///   "successful": 1,
///   "failed": 1,
///   "results": [
///     { "success": true, "link": { ... }, "error": null, "classification": { ... } },
///     { "success": false, "link": { ... }, "error": { "code": "scrape_error", ... }, "classification": null }
///   ]
/// }
/// ```
pub async fn process_links_handler(
    State(state): State<AppState>,
) -> Result<Json<BatchSummary>, AppError> {
    Ok(Json(state.link_service.process_all_links().await?))
}
