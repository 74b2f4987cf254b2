//! In-process link repository.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::document::LinkDocument;
use crate::domain::entities::{Link, LinkStatus};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Repository that keeps links in memory for the lifetime of the process.
///
/// Used by tests and by ephemeral runs that do not need persistence.
#[derive(Default)]
pub struct MemoryLinkRepository {
    document: RwLock<LinkDocument>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        debug!("Using in-memory link storage");
        Self::default()
    }

    /// Creates a repository pre-populated with `links`.
    pub fn with_links(links: Vec<Link>) -> Self {
        let mut document = LinkDocument::default();
        for link in links {
            document.upsert(link);
        }
        Self {
            document: RwLock::new(document),
        }
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn find_all(&self) -> Result<Vec<Link>, AppError> {
        Ok(self.document.read().await.links.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError> {
        Ok(self.document.read().await.find_by_id(id).cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        Ok(self.document.read().await.find_by_url(url).cloned())
    }

    async fn find_by_status(&self, status: LinkStatus) -> Result<Vec<Link>, AppError> {
        Ok(self.document.read().await.with_status(status))
    }

    async fn save(&self, link: Link) -> Result<Link, AppError> {
        let mut document = self.document.write().await;
        document.upsert(link.clone());
        document.touch();
        Ok(link)
    }

    async fn save_all(&self, links: Vec<Link>) -> Result<Vec<Link>, AppError> {
        let mut document = self.document.write().await;
        for link in &links {
            document.upsert(link.clone());
        }
        document.touch();
        Ok(links)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut document = self.document.write().await;
        let removed = document.remove(id);
        if removed {
            document.touch();
        }
        Ok(removed)
    }

    async fn exists(&self, url: &str) -> Result<bool, AppError> {
        Ok(self.document.read().await.find_by_url(url).is_some())
    }
}
