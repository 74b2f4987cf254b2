//! Notification contract.

use async_trait::async_trait;

use crate::domain::entities::Link;

/// Delivers a completed link to every configured endpoint.
///
/// `send` is infallible from the caller's point of view: each endpoint's
/// failure is isolated and logged by the implementation, and never cancels
/// delivery to the remaining endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, link: &Link);
}
