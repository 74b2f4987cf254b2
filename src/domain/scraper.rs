//! Content scraper contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Metadata extracted from a fetched page.
///
/// Every field is optional: pages frequently omit Open Graph tags, and the
/// orchestrator substitutes defaults where a completed link needs text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Leading slice of the raw document body.
    pub content: Option<String>,
}

/// Fetches a URL and extracts title, description and image metadata.
///
/// # Errors
///
/// Implementations return [`AppError::Scrape`] on network failure, a
/// non-success HTTP status, or timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedContent, AppError>;
}
