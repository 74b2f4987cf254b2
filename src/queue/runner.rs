//! Fire-and-forget scheduling on top of [`QueueProcessor`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::processor::QueueProcessor;
use super::task::Task;
use super::task_queue::MemoryTaskQueue;

/// Schedules deferred work without making the caller wait for it.
#[async_trait]
pub trait BackgroundTaskRunner: Send + Sync {
    /// Queues `task` and makes sure a drain is running.
    fn schedule(&self, task: Task);

    fn pending_task_count(&self) -> usize;

    /// Resolves once every scheduled task has finished.
    async fn wait_for_completion(&self);
}

/// In-process runner backed by a [`MemoryTaskQueue`].
#[derive(Clone)]
pub struct LocalBackgroundRunner {
    processor: QueueProcessor<MemoryTaskQueue>,
}

impl LocalBackgroundRunner {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            processor: QueueProcessor::with_poll_interval(MemoryTaskQueue::new(), poll_interval),
        }
    }

    /// Schedules `task` once `delay` has elapsed.
    pub fn schedule_delayed(&self, task: Task, delay: Duration) {
        let runner = self.clone();
        debug!(task = %task.name(), ?delay, "Task deferred");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            runner.schedule(task);
        });
    }

    /// Stops the drain loop after the task in flight.
    pub async fn stop(&self) {
        self.processor.stop().await;
    }

    pub fn processor(&self) -> &QueueProcessor<MemoryTaskQueue> {
        &self.processor
    }
}

impl Default for LocalBackgroundRunner {
    fn default() -> Self {
        Self::new(super::processor::DEFAULT_POLL_INTERVAL)
    }
}

#[async_trait]
impl BackgroundTaskRunner for LocalBackgroundRunner {
    fn schedule(&self, task: Task) {
        self.processor.enqueue(task);
        self.processor.trigger_processing();
    }

    fn pending_task_count(&self) -> usize {
        self.processor.pending_count()
    }

    async fn wait_for_completion(&self) {
        self.processor.wait_for_completion().await;
    }
}
