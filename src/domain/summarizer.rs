//! Summarizer contract.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;

/// Input handed to a summarization backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRequest {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Produces a short natural-language summary for a link.
///
/// No retry is built in; a failure propagates to the caller, which decides
/// whether to mark the link failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Summarize`] when the backend is unreachable or
    /// returns an unusable response.
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, AppError>;
}
