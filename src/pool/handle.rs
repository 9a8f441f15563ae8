use crate::pool::config::PoolConfig;
use crate::pool::supervisor::{PoolEvent, Supervisor};
use crate::pool::types::{
    DEFAULT_MAX_DEPTH, DEFAULT_PRIORITY, FileInfo, PoolStats, TaskOutput, TaskPayload,
};
use crate::pool::{PoolError, Result};
use crate::worker::{FsExecutor, TaskExecutor};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Handle to a running worker pool.
///
/// Owns the supervisor task's event channel. All operations are messages;
/// none of them block the caller beyond awaiting the returned future.
/// Dropping the handle terminates the pool.
pub struct ScanPool {
    events: mpsc::UnboundedSender<PoolEvent>,
}

impl ScanPool {
    /// Start a pool with the default filesystem executor.
    ///
    /// Must be called from within a tokio runtime; the supervisor, worker
    /// units, and heartbeat monitor are spawned onto it.
    pub fn new(config: PoolConfig) -> Self {
        Self::with_executor(config, Arc::new(FsExecutor::default()))
    }

    /// Start a pool with a custom task executor.
    ///
    /// Used by embedders that supply their own classification policy and by
    /// tests that script worker behavior.
    pub fn with_executor(config: PoolConfig, executor: Arc<dyn TaskExecutor>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut supervisor = Supervisor::new(config, executor, events_tx.clone());
        supervisor.initialize();
        tokio::spawn(supervisor.run(events_rx));
        Self { events: events_tx }
    }

    /// Submit a task with an explicit priority.
    ///
    /// Returns immediately-queued work as a future; resolution order across
    /// submissions is unspecified. Higher priorities drain first among
    /// queued (not yet dispatched) entries.
    pub async fn submit(&self, payload: TaskPayload, priority: i32) -> Result<TaskOutput> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(PoolEvent::Submit {
                payload,
                priority,
                reply,
            })
            .map_err(|_| PoolError::PoolTerminated)?;
        response.await.map_err(|_| PoolError::PoolTerminated)?
    }

    /// Scan a directory tree with the default depth limit
    pub async fn scan_directory(&self, dir_path: impl Into<PathBuf>) -> Result<Vec<FileInfo>> {
        self.scan_directory_with(dir_path, "", DEFAULT_MAX_DEPTH)
            .await
    }

    /// Scan a directory tree, controlling the reported relative root and
    /// the recursion limit
    pub async fn scan_directory_with(
        &self,
        dir_path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        max_depth: u32,
    ) -> Result<Vec<FileInfo>> {
        let payload = TaskPayload::ScanDirectory {
            dir_path: dir_path.into(),
            relative_path: relative_path.into(),
            max_depth,
            current_depth: 0,
        };
        match self.submit(payload, DEFAULT_PRIORITY).await? {
            TaskOutput::Files(files) => Ok(files),
            TaskOutput::File(_) => Err(PoolError::TaskFailed(
                "worker returned a single file for a directory scan".to_string(),
            )),
        }
    }

    /// Analyze a single file
    pub async fn analyze_file(
        &self,
        file_path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        base_path: impl Into<PathBuf>,
    ) -> Result<FileInfo> {
        let payload = TaskPayload::AnalyzeFile {
            file_path: file_path.into(),
            relative_path: relative_path.into(),
            base_path: base_path.into(),
        };
        match self.submit(payload, DEFAULT_PRIORITY).await? {
            TaskOutput::File(info) => Ok(info),
            TaskOutput::Files(_) => Err(PoolError::TaskFailed(
                "worker returned a file list for a single-file analysis".to_string(),
            )),
        }
    }

    /// Snapshot of load, queue depth, and per-worker statistics
    pub async fn stats(&self) -> Result<PoolStats> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(PoolEvent::GetStats { reply })
            .map_err(|_| PoolError::PoolTerminated)?;
        response.await.map_err(|_| PoolError::PoolTerminated)
    }

    /// Shut the pool down: heartbeat first, then workers, then state.
    ///
    /// Idempotent. Pending futures reject with [`PoolError::PoolTerminated`].
    pub async fn terminate(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        if self.events.send(PoolEvent::Terminate { ack }).is_err() {
            // Supervisor already gone; nothing left to tear down.
            return Ok(());
        }
        let _ = done.await;
        Ok(())
    }
}

impl Drop for ScanPool {
    fn drop(&mut self) {
        let (ack, _unused) = oneshot::channel();
        let _ = self.events.send(PoolEvent::Terminate { ack });
    }
}
