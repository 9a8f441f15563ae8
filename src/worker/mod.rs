//! Worker unit execution shell.
//!
//! Each unit is an isolated task that receives one [`WorkerRequest`] at a
//! time, runs it through the configured [`TaskExecutor`], and posts the
//! outcome back on the supervisor's event channel. Units never touch pool
//! bookkeeping; concurrency comes from running several units, not from one
//! unit interleaving task messages.
//!
//! A panic inside execution unwinds the unit. That is the crash-containment
//! boundary: the supervisor's watchdog notices the dead unit and restaffs
//! the slot, while tasks lost in the crash are reclaimed by the heartbeat
//! sweep.

mod analyze;
mod executor;
mod scan;

pub use executor::{FsExecutor, TaskExecutor};

use crate::pool::supervisor::PoolEvent;
use crate::pool::{TaskId, TaskPayload};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// One task message handed to a worker unit
pub(crate) struct WorkerRequest {
    pub task_id: TaskId,
    pub payload: TaskPayload,
}

/// Unit run loop: executes task messages in arrival order until the
/// supervisor drops the request channel.
pub(crate) async fn run(
    index: usize,
    executor: Arc<dyn TaskExecutor>,
    mut requests: mpsc::UnboundedReceiver<WorkerRequest>,
    events: mpsc::UnboundedSender<PoolEvent>,
) {
    debug!(worker = index, "worker unit started");
    while let Some(WorkerRequest { task_id, payload }) = requests.recv().await {
        debug!(worker = index, %task_id, kind = payload.kind(), "executing task");
        let outcome = executor
            .execute(&payload)
            .await
            .map_err(|err| format!("{err:#}"));
        if events
            .send(PoolEvent::WorkerReply {
                worker_index: index,
                task_id,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }
    debug!(worker = index, "worker unit stopped");
}
