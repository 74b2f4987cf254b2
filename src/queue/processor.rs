//! Single-flight drain loop over a [`TaskQueue`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::task::Task;
use super::task_queue::TaskQueue;

/// Default interval used by [`QueueProcessor::stop`] and
/// [`QueueProcessor::wait_for_completion`] while polling.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drains a queue one task at a time.
///
/// At most one drain loop runs at any moment; concurrent triggers while a
/// drain is active are no-ops, and tasks enqueued during a drain are picked
/// up by the same loop. A failing or panicking task is logged and the loop
/// moves on to the next one.
///
/// Cloning is cheap and every clone drives the same queue.
pub struct QueueProcessor<Q: TaskQueue> {
    inner: Arc<Shared<Q>>,
}

impl<Q: TaskQueue> Clone for QueueProcessor<Q> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Shared<Q> {
    queue: Mutex<Q>,
    draining: AtomicBool,
    stopped: AtomicBool,
    poll_interval: Duration,
}

impl<Q: TaskQueue> QueueProcessor<Q> {
    pub fn new(queue: Q) -> Self {
        Self::with_poll_interval(queue, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(queue: Q, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Shared {
                queue: Mutex::new(queue),
                draining: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                poll_interval,
            }),
        }
    }

    /// Appends a task without starting a drain.
    pub fn enqueue(&self, task: Task) {
        debug!(task = %task.name(), "Task enqueued");
        self.inner.lock_queue().enqueue(task);
    }

    /// Drains the queue on the current task.
    ///
    /// Clears a previous [`stop`](Self::stop). Returns immediately if another
    /// drain is already running.
    pub async fn start(&self) {
        self.inner.stopped.store(false, Ordering::SeqCst);

        if !self.inner.try_claim() {
            debug!("Queue drain already active");
            return;
        }

        Shared::drain_claimed(&self.inner).await;
    }

    /// Starts a background drain if none is active.
    ///
    /// Returns `true` when this call spawned the drain. Does nothing while the
    /// processor is stopped. Must be called from within a Tokio runtime.
    pub fn trigger_processing(&self) -> bool {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return false;
        }
        if !self.inner.try_claim() {
            return false;
        }

        let inner = self.inner.clone();
        tokio::spawn(async move {
            Shared::drain_claimed(&inner).await;
        });
        true
    }

    /// Requests the drain loop to exit after the task in flight and waits
    /// for it to do so. Tasks still queued stay queued.
    pub async fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);

        while self.inner.draining.load(Ordering::SeqCst) {
            tokio::time::sleep(self.inner.poll_interval).await;
        }

        info!(pending = self.pending_count(), "Queue processor stopped");
    }

    /// Resolves once the queue is empty and no drain is active, or once the
    /// processor is stopped and idle.
    pub async fn wait_for_completion(&self) {
        loop {
            let idle = !self.inner.draining.load(Ordering::SeqCst);
            let stopped = self.inner.stopped.load(Ordering::SeqCst);

            if idle && (stopped || self.inner.queue_is_empty()) {
                return;
            }

            tokio::time::sleep(self.inner.poll_interval).await;
        }
    }

    pub fn is_processing(&self) -> bool {
        self.inner.draining.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock_queue().size()
    }

    /// Discards every queued task. A task already running is unaffected.
    pub fn clear(&self) {
        let dropped = {
            let mut queue = self.inner.lock_queue();
            let size = queue.size();
            queue.clear();
            size
        };

        if dropped > 0 {
            warn!(dropped, "Pending tasks discarded");
        }
    }
}

impl<Q: TaskQueue> Shared<Q> {
    fn lock_queue(&self) -> MutexGuard<'_, Q> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_task(&self) -> Option<Task> {
        self.lock_queue().dequeue()
    }

    fn queue_is_empty(&self) -> bool {
        self.lock_queue().is_empty()
    }

    fn try_claim(&self) -> bool {
        self.draining
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Runs the loop. The caller must hold the `draining` claim.
    async fn drain_claimed(this: &Arc<Self>) {
        loop {
            while !this.stopped.load(Ordering::SeqCst) {
                let Some(task) = this.next_task() else {
                    break;
                };
                Self::execute(task).await;
            }

            this.draining.store(false, Ordering::SeqCst);

            // A task enqueued between the last dequeue and the release above
            // would otherwise wait for the next trigger.
            if this.stopped.load(Ordering::SeqCst) || this.queue_is_empty() || !this.try_claim() {
                break;
            }
        }
    }

    async fn execute(task: Task) {
        let name = task.name().to_string();
        debug!(task = %name, "Task started");

        match tokio::spawn(async move { task.run().await }).await {
            Ok(Ok(())) => debug!(task = %name, "Task finished"),
            Ok(Err(e)) => error!(task = %name, error = %e, "Task failed"),
            Err(e) if e.is_panic() => error!(task = %name, "Task panicked"),
            Err(e) => error!(task = %name, error = %e, "Task aborted"),
        }
    }
}
