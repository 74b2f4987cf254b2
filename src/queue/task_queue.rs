//! FIFO storage for pending tasks.

use std::collections::VecDeque;

use super::task::Task;

/// Ordered container of pending tasks.
///
/// Implementations must hand tasks out in the order they were enqueued.
/// The processor serializes access, so methods take `&mut self`.
pub trait TaskQueue: Send + 'static {
    fn enqueue(&mut self, task: Task);

    /// Removes and returns the oldest task, or `None` when empty.
    fn dequeue(&mut self) -> Option<Task>;

    fn is_empty(&self) -> bool;

    fn size(&self) -> usize;

    /// Drops every pending task without running it.
    fn clear(&mut self);
}

/// In-process queue backed by a [`VecDeque`].
#[derive(Debug, Default)]
pub struct MemoryTaskQueue {
    tasks: VecDeque<Task>,
}

impl MemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskQueue for MemoryTaskQueue {
    fn enqueue(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    fn dequeue(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn size(&self) -> usize {
        self.tasks.len()
    }

    fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Task {
        Task::new(name, || async { Ok(()) })
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = MemoryTaskQueue::new();
        queue.enqueue(noop("a"));
        queue.enqueue(noop("b"));
        queue.enqueue(noop("c"));

        assert_eq!(queue.size(), 3);
        assert_eq!(queue.dequeue().unwrap().name(), "a");
        assert_eq!(queue.dequeue().unwrap().name(), "b");
        assert_eq!(queue.dequeue().unwrap().name(), "c");
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_dequeue_empty() {
        let mut queue = MemoryTaskQueue::new();
        assert!(queue.is_empty());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_clear() {
        let mut queue = MemoryTaskQueue::new();
        queue.enqueue(noop("a"));
        queue.enqueue(noop("b"));

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.size(), 0);
    }
}
