use std::thread;
use std::time::Duration;

/// Tuning knobs for the worker pool.
///
/// The defaults match the behavior expected by the project-import flow:
/// worker count derived from available CPU parallelism, a soft admission
/// limit of three in-flight tasks per worker, and timeout policing on a
/// five-second heartbeat.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of worker units kept alive for the pool's lifetime
    pub max_workers: usize,
    /// In-flight tasks one worker may be assigned before new work queues
    pub per_worker_limit: usize,
    /// Deadline after which an in-flight task is failed by the heartbeat sweep
    pub task_timeout: Duration,
    /// Interval between heartbeat sweeps over in-flight tasks
    pub heartbeat_interval: Duration,
    /// Delay before a crashed worker slot is restaffed
    pub restart_backoff: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_workers: default_worker_count(),
            per_worker_limit: 3,
            task_timeout: Duration::from_millis(30_000),
            heartbeat_interval: Duration::from_millis(5_000),
            restart_backoff: Duration::from_millis(1_000),
        }
    }
}

impl PoolConfig {
    /// Override the worker count, keeping it at least 1
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    /// Override the per-task deadline
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }
}

/// Worker count derived from available parallelism, clamped to 2..=8
fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(2, 8)
}
