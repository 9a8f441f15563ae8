//! Worker-pool scheduling for filesystem scanning and per-file analysis.
//!
//! This module is the core of the crate: a fixed pool of isolated worker
//! units coordinated by a single supervisor task, so that one slow or
//! crashing scan never blocks the process embedding the pool.
//!
//! ## Architecture
//!
//! - [`handle`]: the public [`ScanPool`] handle callers submit through
//! - [`supervisor`]: single-writer actor owning all pool bookkeeping
//! - [`registry`]: per-slot load counters and cumulative statistics
//! - [`queue`]: priority buffer for submissions exceeding worker capacity
//! - [`config`]: pool sizing, admission limits, and timing knobs
//! - [`types`]: task payloads, results, and statistics snapshots
//!
//! Workers communicate with the supervisor exclusively through one event
//! channel; the heartbeat monitor and crash watchdogs feed the same channel.
//! No shared mutable state, no locks on the dispatch path.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scanpool::{PoolConfig, ScanPool};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = ScanPool::new(PoolConfig::default());
//!
//!     let entries = pool.scan_directory("./my-project").await?;
//!     println!("{} entries discovered", entries.len());
//!
//!     pool.terminate().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod handle;
mod queue;
mod registry;
pub(crate) mod supervisor;
mod types;

pub use config::PoolConfig;
pub use handle::ScanPool;
pub use types::{
    CONTENT_ANALYSIS_MAX_BYTES, DEFAULT_MAX_DEPTH, DEFAULT_PRIORITY, FileInfo, IGNORED_DIRS,
    PoolStats, TaskId, TaskOutput, TaskPayload, WorkerStatsSnapshot,
};

/// Scheduling errors surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The worker reported an execution error; not retried
    #[error("task failed: {0}")]
    TaskFailed(String),

    /// The heartbeat sweep reclaimed the task past its deadline
    #[error("task timed out after {elapsed:?}")]
    TaskTimeout { elapsed: std::time::Duration },

    /// The pool was terminated before the operation could complete
    #[error("worker pool terminated")]
    PoolTerminated,
}

/// Result type for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
