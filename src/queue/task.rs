//! Deferred asynchronous tasks and opt-in wrappers.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::anyhow;
use tokio_retry::strategy::FixedInterval;

/// Outcome of a task. Errors are logged by the processor, never propagated.
pub type TaskResult = anyhow::Result<()>;

/// Boxed future produced when a task is started.
pub type TaskFuture = Pin<Box<dyn Future<Output = TaskResult> + Send + 'static>>;

/// A named, zero-argument asynchronous operation that runs at most once.
///
/// Nothing executes until [`Task::run`] is called; constructing a task only
/// captures the closure.
pub struct Task {
    name: String,
    run: Box<dyn FnOnce() -> TaskFuture + Send + 'static>,
}

impl Task {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(move || Box::pin(f())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts the task and returns its future.
    pub fn run(self) -> TaskFuture {
        (self.run)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Builds a task that re-runs `factory` until it succeeds, at most
/// `attempts` times in total, sleeping `delay` between tries. The first try
/// always happens, even when `attempts` is zero.
///
/// The queue itself never retries; wrap a task with this only when the
/// operation is safe to repeat.
pub fn retrying<F, Fut>(name: impl Into<String>, factory: F, attempts: usize, delay: Duration) -> Task
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    let name = name.into();
    let task_name = name.clone();

    Task::new(name, move || async move {
        let mut factory = factory;
        let mut delays = FixedInterval::new(delay).take(attempts.saturating_sub(1));
        let mut tries = 1;

        loop {
            match factory().await {
                Ok(()) => return Ok(()),
                Err(e) => match delays.next() {
                    Some(wait) => {
                        tracing::debug!(task = %task_name, tries, error = %e, "retrying task");
                        tokio::time::sleep(wait).await;
                        tries += 1;
                    }
                    None => {
                        return Err(e.context(format!("task '{task_name}' failed after {tries} attempts")));
                    }
                },
            }
        }
    })
}

/// Wraps `task` so that it fails if it has not finished within `limit`.
pub fn with_timeout(task: Task, limit: Duration) -> Task {
    let name = task.name().to_string();
    let label = name.clone();

    Task::new(name, move || async move {
        match tokio::time::timeout(limit, task.run()).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("task '{label}' did not finish within {limit:?}")),
        }
    })
}
