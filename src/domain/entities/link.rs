//! Link entity and its processing lifecycle.
//!
//! A [`Link`] is never mutated in place: every transition consumes a shared
//! reference and returns a fresh snapshot, so readers holding an older value
//! are never affected by a concurrent transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::error::AppError;
use crate::utils::id_generator::generate_link_id;
use crate::utils::url_normalizer::validate_absolute_url;

/// Processing status of a link.
///
/// ```text
/// pending ──► processing ──► completed
///    │             │
///    └─────────────┴──► failed ──(retry)──► pending
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl LinkStatus {
    pub const ALL: [LinkStatus; 4] = [
        LinkStatus::Pending,
        LinkStatus::Processing,
        LinkStatus::Completed,
        LinkStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Pending => "pending",
            LinkStatus::Processing => "processing",
            LinkStatus::Completed => "completed",
            LinkStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LinkStatus::Pending),
            "processing" => Ok(LinkStatus::Processing),
            "completed" => Ok(LinkStatus::Completed),
            "failed" => Ok(LinkStatus::Failed),
            other => Err(AppError::bad_request(
                "Unknown link status",
                json!({ "status": other, "allowed": ["pending", "processing", "completed", "failed"] }),
            )),
        }
    }
}

/// Enrichment data applied when processing completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedContent {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub summary: String,
}

/// A submitted URL and its enrichment state.
///
/// Fields are private; use the accessors to read and the transition methods
/// to derive new snapshots. Serialized field names are camelCase to match the
/// persisted `{ links, lastUpdated }` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    id: String,
    url: String,
    #[serde(default)]
    tags: Vec<String>,
    status: LinkStatus,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    image: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    error: Option<String>,
}

impl Link {
    /// Creates a new pending link.
    ///
    /// Tags are deduplicated keeping their first-seen order; blank tags are
    /// dropped and surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `url` is not an absolute URI.
    pub fn create<I, S>(url: &str, tags: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let url = validate_absolute_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "url": url, "reason": e.to_string() }))
        })?;

        Ok(Self {
            id: generate_link_id(),
            url,
            tags: merge_tags(Vec::new(), tags),
            status: LinkStatus::Pending,
            title: None,
            description: None,
            summary: None,
            image: None,
            created_at: Utc::now(),
            processed_at: None,
            error: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Moves a pending link to `processing`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] unless the link is pending.
    pub fn start_processing(&self) -> Result<Self, AppError> {
        self.require(&[LinkStatus::Pending], "start processing")?;

        Ok(Self {
            status: LinkStatus::Processing,
            ..self.clone()
        })
    }

    /// Completes processing with the scraped and summarized content.
    ///
    /// Blank strings are rejected so a completed link always carries a
    /// non-empty title, description and summary.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] unless the link is processing, and
    /// [`AppError::Validation`] if any required text field is blank.
    pub fn complete_processing(&self, content: ProcessedContent) -> Result<Self, AppError> {
        self.require(&[LinkStatus::Processing], "complete processing")?;

        for (field, value) in [
            ("title", &content.title),
            ("description", &content.description),
            ("summary", &content.summary),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::bad_request(
                    "Completed links require non-empty content",
                    json!({ "id": self.id, "field": field }),
                ));
            }
        }

        Ok(Self {
            title: Some(content.title),
            description: Some(content.description),
            image: content.image.filter(|i| !i.trim().is_empty()),
            summary: Some(content.summary),
            status: LinkStatus::Completed,
            processed_at: Some(Utc::now()),
            error: None,
            ..self.clone()
        })
    }

    /// Marks the link as failed with the given error message.
    ///
    /// Allowed from `pending` and `processing`; terminal links cannot fail
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] for completed or failed links.
    pub fn fail_processing(&self, error: impl fmt::Display) -> Result<Self, AppError> {
        self.require(
            &[LinkStatus::Pending, LinkStatus::Processing],
            "fail processing",
        )?;

        Ok(Self {
            status: LinkStatus::Failed,
            processed_at: Some(Utc::now()),
            error: Some(error.to_string()),
            ..self.clone()
        })
    }

    /// Resets a failed link to `pending` so it can be processed again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] unless the link is failed.
    pub fn retry(&self) -> Result<Self, AppError> {
        self.require(&[LinkStatus::Failed], "retry")?;

        Ok(Self {
            status: LinkStatus::Pending,
            processed_at: None,
            error: None,
            ..self.clone()
        })
    }

    /// Returns a copy with `new_tags` merged in. Legal in every status.
    pub fn add_tags<I, S>(&self, new_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: merge_tags(self.tags.clone(), new_tags),
            ..self.clone()
        }
    }

    pub fn can_be_processed(&self) -> bool {
        self.status == LinkStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == LinkStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == LinkStatus::Failed
    }

    fn require(&self, allowed: &[LinkStatus], action: &str) -> Result<(), AppError> {
        if allowed.contains(&self.status) {
            return Ok(());
        }

        Err(AppError::invalid_state(
            format!("Cannot {action} a {} link", self.status),
            json!({
                "id": self.id,
                "status": self.status.as_str(),
                "allowed": allowed.iter().map(LinkStatus::as_str).collect::<Vec<_>>(),
            }),
        ))
    }
}

/// Set-union of `existing` and `new_tags`, preserving first-seen order.
fn merge_tags<I, S>(mut existing: Vec<String>, new_tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for tag in new_tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !existing.iter().any(|t| t == tag) {
            existing.push(tag.to_string());
        }
    }
    existing
}
