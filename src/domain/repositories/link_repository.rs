//! Repository trait for link persistence.

use crate::domain::entities::{Link, LinkStatus};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for storing link snapshots.
///
/// `save` is an upsert keyed by [`Link::id`]. Implementations give no
/// transaction isolation: concurrent saves of the same id are
/// last-writer-wins.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileLinkRepository`] - JSON file on disk
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process storage
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns every stored link in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the backing store cannot be read.
    async fn find_all(&self) -> Result<Vec<Link>, AppError>;

    /// Finds a link by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its exact submitted URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError>;

    /// Returns all links currently in `status`.
    async fn find_by_status(&self, status: LinkStatus) -> Result<Vec<Link>, AppError>;

    /// Inserts or replaces the link with the same id and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the write fails.
    async fn save(&self, link: Link) -> Result<Link, AppError>;

    /// Upserts several links in one write.
    async fn save_all(&self, links: Vec<Link>) -> Result<Vec<Link>, AppError>;

    /// Removes a link. Returns `Ok(false)` when no link has that id.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Returns true if a link with exactly this URL is stored.
    async fn exists(&self, url: &str) -> Result<bool, AppError>;
}
