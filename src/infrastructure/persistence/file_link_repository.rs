//! JSON file implementation of the link repository.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::document::LinkDocument;
use crate::domain::entities::{Link, LinkStatus};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, map_io_error, map_json_error};

/// File name of the store inside the data directory.
pub const LINKS_FILE: &str = "links.json";

/// Stores every link in a single pretty-printed `links.json` file.
///
/// Each operation reads the whole document, and writes go to a temporary
/// file that is renamed over the original. An async mutex serializes
/// read-modify-write cycles within this process; separate processes sharing
/// the file are not coordinated.
///
/// A missing file is an empty store. A file that exists but does not parse
/// is reported as [`AppError::Storage`] and left untouched.
pub struct FileLinkRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLinkRepository {
    /// Opens the store under `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the directory cannot be created.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(map_io_error)?;

        let path = data_dir.join(LINKS_FILE);
        info!(path = %path.display(), "Using file link storage");

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<LinkDocument, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::storage(
                    "Stored links file is corrupt",
                    json!({ "path": self.path.display().to_string(), "reason": e.to_string() }),
                )
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(LinkDocument::default()),
            Err(e) => Err(map_io_error(e)),
        }
    }

    async fn persist(&self, document: &mut LinkDocument) -> Result<(), AppError> {
        document.touch();
        let bytes = serde_json::to_vec_pretty(document).map_err(map_json_error)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(map_io_error)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(map_io_error)?;

        debug!(links = document.links.len(), "Links file written");
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for FileLinkRepository {
    async fn find_all(&self) -> Result<Vec<Link>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.links)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.find_by_id(id).cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.find_by_url(url).cloned())
    }

    async fn find_by_status(&self, status: LinkStatus) -> Result<Vec<Link>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.with_status(status))
    }

    async fn save(&self, link: Link) -> Result<Link, AppError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        document.upsert(link.clone());
        self.persist(&mut document).await?;
        Ok(link)
    }

    async fn save_all(&self, links: Vec<Link>) -> Result<Vec<Link>, AppError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        for link in &links {
            document.upsert(link.clone());
        }
        self.persist(&mut document).await?;
        Ok(links)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        if !document.remove(id) {
            return Ok(false);
        }
        self.persist(&mut document).await?;
        Ok(true)
    }

    async fn exists(&self, url: &str) -> Result<bool, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.find_by_url(url).is_some())
    }
}
