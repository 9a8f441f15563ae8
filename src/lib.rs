//! # Scanpool
//!
//! A worker-pool scheduler that offloads filesystem scanning and per-file
//! analysis (the expensive part of project import and discovery) onto a
//! fixed pool of isolated worker units, so a single slow or crashing scan
//! never blocks the orchestrating process.
//!
//! ## Architecture Overview
//!
//! The system consists of several key components organized into modules:
//!
//! - **[`pool`]**: the scheduler core: task submission, load-aware
//!   dispatch, priority queueing, heartbeat-based timeout detection, and
//!   worker crash recovery
//! - **[`worker`]**: the worker unit execution shell and the
//!   [`TaskExecutor`] seam behind it
//! - **[`classify`]**: the file classification policy consumed by workers
//! - **[`cli`]**: the `scanpool` binary's argument and configuration layer
//!
//! ## Scheduling Guarantees
//!
//! - **Liveness**: every submitted task resolves or rejects within the task
//!   timeout plus one heartbeat interval
//! - **Fairness**: new work goes to the least-loaded worker; queued work
//!   drains in descending-priority order, FIFO among equal priorities
//! - **Fault isolation**: a worker panic is contained to its unit; the slot
//!   is restaffed after a fixed backoff while other workers keep running
//!
//! All pool bookkeeping is owned by a single supervisor task fed by one
//! event channel; workers, the heartbeat monitor, and crash watchdogs never
//! share mutable state with it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scanpool::{PoolConfig, ScanPool};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = ScanPool::new(PoolConfig::default());
//!
//!     // Scan a project tree through the pool
//!     let entries = pool.scan_directory("./my-project").await?;
//!     let importable = entries.iter().filter(|e| e.is_importable).count();
//!     println!("{} of {} entries importable", importable, entries.len());
//!
//!     pool.terminate().await?;
//!     Ok(())
//! }
//! ```

/// Worker-pool scheduling core.
///
/// Task submission, dispatch, priority queueing, timeout policing, and
/// crash recovery, coordinated by a single supervisor task.
pub mod pool;

/// Worker unit execution shell.
///
/// The per-unit run loop and the [`TaskExecutor`] trait that defines what
/// tasks actually do.
pub mod worker;

/// File classification policy.
///
/// The [`Classifier`] seam workers consult for import verdicts, plus the
/// built-in extension-based default.
pub mod classify;

/// Command-line interface for the `scanpool` binary.
pub mod cli;

// Re-export main pool types
pub use pool::{
    DEFAULT_MAX_DEPTH, DEFAULT_PRIORITY, FileInfo, PoolConfig, PoolError, PoolStats, ScanPool,
    TaskId, TaskOutput, TaskPayload, WorkerStatsSnapshot,
};

// Re-export the execution and classification seams
pub use classify::{Classifier, ExtensionClassifier, FileClassification};
pub use worker::{FsExecutor, TaskExecutor};
