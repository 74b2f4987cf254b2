//! Content classification result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad content category of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    SocialMedia,
    Video,
    LongContent,
    ShortContent,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::SocialMedia => "social_media",
            ContentType::Video => "video",
            ContentType::LongContent => "long_content",
            ContentType::ShortContent => "short_content",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision on whether a link warrants AI summarization.
///
/// Produced fresh on every call to
/// [`crate::domain::classifier::ContentClassifier::classify`]; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentClassification {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub should_summarize: bool,
    pub reason: String,
}

impl ContentClassification {
    pub fn new(content_type: ContentType, should_summarize: bool, reason: impl Into<String>) -> Self {
        Self {
            content_type,
            should_summarize,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_type_key() {
        let c = ContentClassification::new(ContentType::LongContent, true, "long");
        let value = serde_json::to_value(&c).unwrap();

        assert_eq!(value["type"], "long_content");
        assert_eq!(value["shouldSummarize"], true);
        assert_eq!(value["reason"], "long");
    }
}
