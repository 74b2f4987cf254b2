//! Anthropic Messages API summarizer.

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::summarizer::{Summarizer, SummaryRequest};
use crate::error::AppError;
use crate::utils::text::truncate_chars;

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.3;

/// Upper bound on the cleaned summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 400;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Summarizes links with Claude.
///
/// Failures are returned as [`AppError::Summarize`]; there is no retry and
/// no silent fallback.
pub struct ClaudeSummarizer {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
    prefix: Regex,
    whitespace: Regex,
}

impl ClaudeSummarizer {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the cleanup patterns fail to compile.
    pub fn new(api_key: &str, model: &str) -> Result<Self, AppError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                AppError::internal("Invalid summary pattern", json!({ "reason": e.to_string() }))
            })
        };

        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: ANTHROPIC_API_URL.to_string(),
            http: reqwest::Client::new(),
            prefix: compile(r"(?i)^summary:\s*")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Points the client at another API root, e.g. a local mock server.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key).map_err(|_| {
            AppError::summarize("API key is not a valid header value", json!({}))
        })?;
        headers.insert("x-api-key", key);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn cleanup(&self, raw: &str) -> String {
        let stripped = self.prefix.replace(raw.trim(), "");
        let collapsed = self.whitespace.replace_all(&stripped, " ");
        truncate_chars(collapsed.trim(), MAX_SUMMARY_CHARS)
    }
}

fn build_prompt(request: &SummaryRequest) -> String {
    format!(
        "Analyze the following web page and write a concise, useful summary.\n\n\
         Page information:\n\
         - URL: {}\n\
         - Title: {}\n\
         - Description: {}\n\n\
         Guidelines:\n\
         1. Summarize the key content in 2-3 sentences\n\
         2. Make clear why a reader would want to open the link\n\
         3. Use a natural, professional tone\n\
         4. Avoid filler and exaggeration\n\n\
         Summary:",
        request.url,
        request.title.as_deref().unwrap_or("No title"),
        request.description.as_deref().unwrap_or("No description"),
    )
}

#[async_trait]
impl Summarizer for ClaudeSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, AppError> {
        let url = format!("{}/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![Message {
                role: "user",
                content: build_prompt(request),
            }],
        };

        debug!(model = %self.model, link = %request.url, "Claude summarize request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::summarize("Summarizer request failed", json!({ "reason": e.to_string() }))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Claude API error");
            return Err(AppError::summarize(
                format!("Claude API error ({})", status.as_u16()),
                json!({ "status": status.as_u16(), "body": error_text }),
            ));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            AppError::summarize("Malformed summarizer response", json!({ "reason": e.to_string() }))
        })?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(" ");

        let summary = self.cleanup(&text);
        if summary.is_empty() {
            return Err(AppError::summarize(
                "Summarizer returned no text",
                json!({ "url": request.url }),
            ));
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarizer() -> ClaudeSummarizer {
        ClaudeSummarizer::new("test-key", DEFAULT_MODEL).unwrap()
    }

    #[test]
    fn test_cleanup_strips_prefix_and_whitespace() {
        let s = summarizer();
        assert_eq!(
            s.cleanup("  Summary:  First line.\n\nSecond   line.  "),
            "First line. Second line."
        );
        assert_eq!(s.cleanup("summary: lower"), "lower");
    }

    #[test]
    fn test_cleanup_caps_length() {
        let s = summarizer();
        let long = "word ".repeat(200);
        assert_eq!(s.cleanup(&long).chars().count(), MAX_SUMMARY_CHARS);
    }

    #[test]
    fn test_prompt_mentions_metadata() {
        let prompt = build_prompt(&SummaryRequest {
            url: "https://example.com".into(),
            title: Some("Example".into()),
            description: None,
        });

        assert!(prompt.contains("URL: https://example.com"));
        assert!(prompt.contains("Title: Example"));
        assert!(prompt.contains("Description: No description"));
    }
}
