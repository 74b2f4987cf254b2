//! Deterministic summarizer used when no AI backend is configured.

use async_trait::async_trait;

use crate::domain::summarizer::{Summarizer, SummaryRequest};
use crate::error::AppError;
use crate::utils::text::truncate_chars;

const MAX_CHARS: usize = 200;
const GENERIC: &str = "Open the link to see its content.";

/// Builds a summary from the title and description alone. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSummarizer;

impl FallbackSummarizer {
    pub fn new() -> Self {
        Self
    }
}

pub fn fallback_summary(title: Option<&str>, description: Option<&str>) -> String {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    match (title, description) {
        (Some(t), Some(d)) => truncate_chars(&format!("{t}: {d}"), MAX_CHARS),
        (Some(t), None) => format!("A link about {t}."),
        (None, Some(d)) => truncate_chars(d, MAX_CHARS),
        (None, None) => GENERIC.to_string(),
    }
}

#[async_trait]
impl Summarizer for FallbackSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, AppError> {
        Ok(fallback_summary(
            request.title.as_deref(),
            request.description.as_deref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_variants() {
        assert_eq!(fallback_summary(Some("T"), Some("D")), "T: D");
        assert_eq!(fallback_summary(Some("Rust"), None), "A link about Rust.");
        assert_eq!(fallback_summary(None, Some("Only description")), "Only description");
        assert_eq!(fallback_summary(Some(" "), None), GENERIC);
    }

    #[test]
    fn test_fallback_caps_length() {
        let long = "d".repeat(500);
        assert_eq!(fallback_summary(Some("T"), Some(&long)).chars().count(), MAX_CHARS);
    }

    #[tokio::test]
    async fn test_summarize_never_fails() {
        let summary = FallbackSummarizer::new()
            .summarize(&SummaryRequest {
                url: "https://example.com".into(),
                title: None,
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(summary, GENERIC);
    }
}
