//! API route configuration.

use crate::api::handlers::{
    add_tags_handler, create_link_handler, delete_link_handler, get_link_handler,
    list_links_handler, preview_handler, process_links_handler, reprocess_link_handler,
    stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST   /links`                - Add a link and queue its processing (202)
/// - `GET    /links?status=`        - List links, optionally by status
/// - `GET    /links/{id}`           - Fetch one link
/// - `DELETE /links/{id}`           - Delete a link (204)
/// - `POST   /links/{id}/tags`      - Merge tags into a link
/// - `POST   /links/{id}/reprocess` - Process a link again and wait for it
/// - `POST   /process-links`        - Process every pending link and wait for the batch
/// - `POST   /preview`              - Scrape and summarize a URL without storing it
/// - `GET    /stats`                - Counts by status and tag
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route(
            "/links/{id}",
            get(get_link_handler).delete(delete_link_handler),
        )
        .route("/links/{id}/tags", post(add_tags_handler))
        .route("/links/{id}/reprocess", post(reprocess_link_handler))
        .route("/process-links", post(process_links_handler))
        .route("/preview", post(preview_handler))
        .route("/stats", get(stats_handler))
}
