use crate::pool::types::{TaskId, TaskOutput, TaskPayload};
use tokio::sync::oneshot;

/// A submission waiting for worker capacity.
///
/// Holds the caller's reply channel; dropping an entry (pool shutdown)
/// rejects the caller's future.
pub(crate) struct QueueEntry {
    pub task_id: TaskId,
    pub payload: TaskPayload,
    pub priority: i32,
    pub reply: oneshot::Sender<crate::pool::Result<TaskOutput>>,
}

/// Unbounded buffer of pending submissions, drained in descending-priority
/// order with FIFO arrival order preserved among equal priorities.
///
/// Removal sorts before popping. That is O(n log n) per pop, acceptable
/// because queue depth stays bounded by burst submission rate against
/// worker throughput.
#[derive(Default)]
pub(crate) struct TaskQueue {
    entries: Vec<QueueEntry>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append to the end, preserving arrival order
    pub fn push(&mut self, entry: QueueEntry) {
        self.entries.push(entry);
    }

    /// Remove and return the highest-priority entry, oldest first on ties
    pub fn pop_next(&mut self) -> Option<QueueEntry> {
        if self.entries.is_empty() {
            return None;
        }
        // Stable sort keeps FIFO order among equal priorities.
        self.entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        Some(self.entries.remove(0))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all pending entries, rejecting their callers
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
