//! Content classification policy.
//!
//! Decides, without any I/O, whether a link deserves an AI summary. Social
//! and video platforms never do; everything else depends on how much text
//! the page exposes in its title and description.

use crate::domain::entities::{ContentClassification, ContentType};
use crate::utils::url_normalizer::extract_hostname;

/// Default minimum combined title + description length (in characters) for
/// content to be summarized.
pub const DEFAULT_SUMMARY_THRESHOLD: usize = 200;

/// Hosts whose content is short-form social posts.
pub const SOCIAL_MEDIA_DOMAINS: &[&str] = &[
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "tiktok.com",
    "snapchat.com",
    "reddit.com",
    "discord.com",
    "telegram.org",
    "whatsapp.com",
    "threads.net",
    "linkedin.com",
];

/// Hosts serving video content.
pub const VIDEO_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "twitch.tv",
    "netflix.com",
    "dailymotion.com",
];

/// Pure, deterministic classifier.
#[derive(Debug, Clone, Copy)]
pub struct ContentClassifier {
    threshold: usize,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_THRESHOLD)
    }
}

impl ContentClassifier {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Classifies a link from its URL and scraped metadata.
    ///
    /// # Rules (first match wins)
    ///
    /// 1. Host on [`SOCIAL_MEDIA_DOMAINS`] → `social_media`, no summary
    /// 2. Host on [`VIDEO_DOMAINS`] → `video`, no summary
    /// 3. `chars(title) + chars(description) >= threshold` → `long_content`, summarize
    /// 4. Otherwise → `short_content`, no summary
    ///
    /// A malformed URL has an empty host and falls through to rule 3.
    pub fn classify(
        &self,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> ContentClassification {
        let host = extract_hostname(url);

        if let Some(domain) = matching_domain(&host, SOCIAL_MEDIA_DOMAINS) {
            return ContentClassification::new(
                ContentType::SocialMedia,
                false,
                format!("Social media platform ({domain}); using page metadata only"),
            );
        }

        if let Some(domain) = matching_domain(&host, VIDEO_DOMAINS) {
            return ContentClassification::new(
                ContentType::Video,
                false,
                format!("Video platform ({domain}); using page metadata only"),
            );
        }

        let length = title.map_or(0, |t| t.chars().count())
            + description.map_or(0, |d| d.chars().count());

        if length >= self.threshold {
            ContentClassification::new(
                ContentType::LongContent,
                true,
                format!("{length} characters of metadata (threshold {})", self.threshold),
            )
        } else {
            ContentClassification::new(
                ContentType::ShortContent,
                false,
                format!(
                    "Only {length} characters of metadata (threshold {})",
                    self.threshold
                ),
            )
        }
    }
}

/// Returns the denylisted domain `host` belongs to, matching the domain
/// itself or any of its subdomains.
fn matching_domain<'a>(host: &str, domains: &[&'a str]) -> Option<&'a str> {
    if host.is_empty() {
        return None;
    }

    domains.iter().copied().find(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
