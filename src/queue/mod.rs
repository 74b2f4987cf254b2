//! In-process task queue used to run link processing off the request path.
//!
//! - [`Task`] - A deferred zero-argument async operation
//! - [`TaskQueue`] / [`MemoryTaskQueue`] - FIFO storage
//! - [`QueueProcessor`] - Single-flight drain loop
//! - [`BackgroundTaskRunner`] / [`LocalBackgroundRunner`] - Fire-and-forget scheduling

pub mod processor;
pub mod runner;
pub mod task;
pub mod task_queue;

pub use processor::{DEFAULT_POLL_INTERVAL, QueueProcessor};
pub use runner::{BackgroundTaskRunner, LocalBackgroundRunner};
pub use task::{Task, TaskFuture, TaskResult, retrying, with_timeout};
pub use task_queue::{MemoryTaskQueue, TaskQueue};
