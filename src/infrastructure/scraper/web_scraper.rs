//! HTTP implementation of [`ContentScraper`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use super::metadata::extract_metadata;
use crate::domain::scraper::{ContentScraper, ScrapedContent};
use crate::error::AppError;
use crate::utils::text::truncate_chars;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_USER_AGENT: &str = "LinkDump Bot 1.0";

/// Number of leading body characters kept in [`ScrapedContent::content`].
pub const CONTENT_PREVIEW_CHARS: usize = 1000;

/// Fetches pages with `reqwest` and reads their metadata with `scraper`.
pub struct WebContentScraper {
    client: Client,
}

impl WebContentScraper {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::internal("Failed to build HTTP client", json!({ "reason": e.to_string() }))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentScraper for WebContentScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedContent, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "Scrape timed out"
            } else {
                "Scrape request failed"
            };
            warn!(url = %url, error = %e, "{message}");
            AppError::scrape(message, json!({ "url": url, "reason": e.to_string() }))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::scrape(
                format!("HTTP {}", status.as_u16()),
                json!({ "url": url, "status": status.as_u16() }),
            ));
        }

        let body = response.text().await.map_err(|e| {
            AppError::scrape(
                "Failed to read response body",
                json!({ "url": url, "reason": e.to_string() }),
            )
        })?;

        let meta = extract_metadata(&body);
        debug!(
            url = %url,
            title = meta.title.as_deref().unwrap_or(""),
            has_description = meta.description.is_some(),
            "Page scraped"
        );

        Ok(ScrapedContent {
            title: meta.title,
            description: meta.description,
            image: meta.image,
            content: Some(truncate_chars(&body, CONTENT_PREVIEW_CHARS)),
        })
    }
}
