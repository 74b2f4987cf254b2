//! Handlers for link endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{
    AddTagsRequest, CreateLinkRequest, LinkListResponse, ListLinksQuery, PreviewRequest,
};
use crate::application::services::LinkPreview;
use crate::domain::entities::{Link, LinkStatus};
use crate::error::AppError;
use crate::state::AppState;

/// Adds a link and queues its processing.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/post", "tags": ["rust"] }
/// ```
///
/// # Response
///
/// **202 Accepted** with the pending link. Scraping, summarization and
/// notification happen in the background.
///
/// # Errors
///
/// - 400 Bad Request: invalid payload or URL
/// - 409 Conflict: URL already stored
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<Link>), AppError> {
    payload.validate()?;

    let tags = payload.tags.unwrap_or_default();
    let link = state.link_service.add_link(&payload.url, tags).await?;

    Ok((StatusCode::ACCEPTED, Json(link)))
}

/// Lists stored links.
///
/// # Endpoint
///
/// `GET /api/links?status=pending`
///
/// # Errors
///
/// Returns 400 Bad Request for an unknown status value.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<LinkStatus>)
        .transpose()?;

    let links = state.link_service.list_links(status).await?;

    Ok(Json(LinkListResponse {
        total: links.len(),
        links,
    }))
}

/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Link>, AppError> {
    Ok(Json(state.link_service.get_link(&id).await?))
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Response
///
/// - **204 No Content**: deleted
/// - **404 Not Found**: unknown id
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Merges tags into a link. Legal in every status.
///
/// # Endpoint
///
/// `POST /api/links/{id}/tags`
pub async fn add_tags_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddTagsRequest>,
) -> Result<Json<Link>, AppError> {
    payload.validate()?;

    Ok(Json(state.link_service.add_tags(&id, payload.tags).await?))
}

/// Processes a link again and waits for the result.
///
/// A failed link is reset to pending first.
///
/// # Endpoint
///
/// `POST /api/links/{id}/reprocess`
///
/// # Errors
///
/// - 404 Not Found: unknown id
/// - 409 Conflict: link is completed or currently processing
/// - 502 Bad Gateway: scraping or summarization failed (the link is saved as failed)
pub async fn reprocess_link_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Link>, AppError> {
    Ok(Json(state.link_service.reprocess_link(&id).await?))
}

/// Scrapes and summarizes a URL without storing it or notifying anyone.
///
/// # Endpoint
///
/// `POST /api/preview`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/post" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com/post",
///   "title": "Example Post",
///   "description": "A post about things",
///   "summary": "Short summary of the post"
/// }
/// ```
///
/// A summarizer failure falls back to the page description.
///
/// # Errors
///
/// - 400 Bad Request: invalid payload or URL
/// - 502 Bad Gateway: the page could not be fetched
pub async fn preview_handler(
    State(state): State<AppState>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<LinkPreview>, AppError> {
    payload.validate()?;

    Ok(Json(state.link_service.preview(&payload.url).await?))
}
