//! Host-facing service: schedules processing and sends notifications.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{info, warn};

use super::link_orchestrator::{LinkOrchestrator, LinkPreview, LinkProcessingResult, LinkStatistics};
use crate::domain::entities::{Link, LinkStatus};
use crate::domain::notifier::Notifier;
use crate::error::AppError;
use crate::queue::{BackgroundTaskRunner, Task, retrying, with_timeout};

/// Upper bound for one notification task.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts for a background batch run whose listing of pending links fails.
pub const BATCH_ATTEMPTS: usize = 3;
pub const BATCH_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Totals for one batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<LinkProcessingResult>,
}

impl BatchSummary {
    fn from_results(results: Vec<LinkProcessingResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            processed: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }
}

/// Wraps [`LinkOrchestrator`] with background scheduling and notification.
///
/// Every operation that processes links runs as a task on the runner, so
/// processing is serialized with the queue drain no matter which entry point
/// asked for it. A completed link gets exactly one notification task.
#[derive(Clone)]
pub struct LinkManagementService {
    orchestrator: Arc<LinkOrchestrator>,
    runner: Arc<dyn BackgroundTaskRunner>,
    notifier: Arc<dyn Notifier>,
}

impl LinkManagementService {
    pub fn new(
        orchestrator: Arc<LinkOrchestrator>,
        runner: Arc<dyn BackgroundTaskRunner>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orchestrator,
            runner,
            notifier,
        }
    }

    /// Stores a new link and schedules its processing in the background.
    ///
    /// Returns the pending link immediately.
    ///
    /// # Errors
    ///
    /// See [`LinkOrchestrator::create_link`].
    pub async fn add_link<I, S>(&self, url: &str, tags: I) -> Result<Link, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let link = self.orchestrator.create_link(url, tags).await?;
        self.schedule_processing(link.id());
        Ok(link)
    }

    /// Queues `process_link` for `id`, followed by a notification on success.
    pub fn schedule_processing(&self, id: &str) {
        let service = self.clone();
        let id = id.to_string();

        self.runner.schedule(Task::new(format!("process-link:{id}"), move || async move {
            let link = service.orchestrator.process_link(&id).await?;
            service.schedule_notification(link);
            Ok(())
        }));
    }

    /// Queues a timed notification for a completed link.
    fn schedule_notification(&self, link: Link) {
        let notifier = self.notifier.clone();
        let task = Task::new(format!("notify:{}", link.id()), move || async move {
            notifier.send(&link).await;
            Ok(())
        });
        self.runner.schedule(with_timeout(task, NOTIFICATION_TIMEOUT));
    }

    /// Builds the background batch task over every pending link.
    ///
    /// Listing failures are retried [`BATCH_ATTEMPTS`] times in total.
    pub fn pending_batch_task(&self) -> Task {
        let service = self.clone();
        retrying(
            "process-pending",
            move || {
                let service = service.clone();
                async move {
                    let summary = service.run_pending_batch().await?;
                    info!(
                        processed = summary.processed,
                        successful = summary.successful,
                        failed = summary.failed,
                        "Pending batch finished"
                    );
                    Ok(())
                }
            },
            BATCH_ATTEMPTS,
            BATCH_RETRY_DELAY,
        )
    }

    /// Processes every pending link on the queue and waits for the summary.
    ///
    /// Notifications for completed links are queued behind the batch.
    pub async fn process_all_links(&self) -> Result<BatchSummary, AppError> {
        let service = self.clone();
        self.run_queued("process-pending", move || async move {
            service.run_pending_batch().await
        })
        .await
    }

    /// Processes a single link on the queue and waits for the result,
    /// resetting it first if it failed.
    ///
    /// # Errors
    ///
    /// Returns the processing error after the link has been saved as failed,
    /// or [`AppError::InvalidState`] for a link that is completed or still
    /// processing.
    pub async fn reprocess_link(&self, id: &str) -> Result<Link, AppError> {
        let service = self.clone();
        let task_id = id.to_string();

        self.run_queued(format!("reprocess-link:{id}"), move || async move {
            let id = task_id;
            let link = service.orchestrator.get_link(&id).await?;
            if link.is_failed() {
                service.orchestrator.retry_link(&id).await?;
            }

            let processed = service.orchestrator.process_link(&id).await.inspect_err(|e| {
                warn!(link_id = %id, error = %e, "Reprocessing failed");
            })?;
            service.schedule_notification(processed.clone());
            Ok(processed)
        })
        .await
    }

    /// Scrapes and summarizes a URL without storing it.
    ///
    /// # Errors
    ///
    /// See [`LinkOrchestrator::preview`].
    pub async fn preview(&self, url: &str) -> Result<LinkPreview, AppError> {
        self.orchestrator.preview(url).await
    }

    /// Fails every link left in `processing` by an earlier run.
    pub async fn recover_interrupted(&self) -> Result<Vec<Link>, AppError> {
        self.orchestrator.recover_interrupted().await
    }

    async fn run_pending_batch(&self) -> Result<BatchSummary, AppError> {
        let results = self.orchestrator.process_all_pending().await?;

        for result in &results {
            if let Some(link) = result.link.as_ref().filter(|l| result.success && l.is_completed()) {
                self.schedule_notification(link.clone());
            }
        }

        Ok(BatchSummary::from_results(results))
    }

    /// Runs `f` as a queued task and waits for its value.
    ///
    /// Must not be awaited from inside a queued task: the drain runs one
    /// task at a time.
    async fn run_queued<T, F, Fut>(&self, name: impl Into<String>, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        let name = name.into();
        let (tx, rx) = oneshot::channel();

        self.runner.schedule(Task::new(name.clone(), move || async move {
            let result = f().await;
            let outcome = match &result {
                Ok(_) => Ok(()),
                Err(e) => Err(anyhow::Error::new(e.clone())),
            };
            let _ = tx.send(result);
            outcome
        }));

        rx.await.map_err(|_| {
            AppError::internal("Queued task ended without a result", json!({ "task": name }))
        })?
    }

    pub async fn list_links(&self, status: Option<LinkStatus>) -> Result<Vec<Link>, AppError> {
        self.orchestrator.list_links(status).await
    }

    pub async fn get_link(&self, id: &str) -> Result<Link, AppError> {
        self.orchestrator.get_link(id).await
    }

    pub async fn add_tags<I, S>(&self, id: &str, tags: I) -> Result<Link, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.orchestrator.add_tags_to_link(id, tags).await
    }

    pub async fn delete_link(&self, id: &str) -> Result<(), AppError> {
        self.orchestrator.delete_link(id).await
    }

    pub async fn statistics(&self) -> Result<LinkStatistics, AppError> {
        self.orchestrator.get_statistics().await
    }

    pub fn pending_task_count(&self) -> usize {
        self.runner.pending_task_count()
    }

    /// Waits until every scheduled task has run.
    pub async fn wait_for_idle(&self) {
        self.runner.wait_for_completion().await;
    }
}
