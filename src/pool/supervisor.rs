use crate::pool::PoolError;
use crate::pool::config::PoolConfig;
use crate::pool::queue::{QueueEntry, TaskQueue};
use crate::pool::registry::WorkerRegistry;
use crate::pool::types::{PoolStats, TaskId, TaskOutput, TaskPayload};
use crate::worker::{self, TaskExecutor, WorkerRequest};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Messages the supervisor receives on its single event channel.
///
/// Everything that touches pool bookkeeping flows through here: caller
/// submissions, worker replies, watchdog crash reports, respawn timers,
/// and heartbeat ticks. The supervisor task is the only mutator of the
/// registry, queue, and active-task map.
pub(crate) enum PoolEvent {
    Submit {
        payload: TaskPayload,
        priority: i32,
        reply: oneshot::Sender<crate::pool::Result<TaskOutput>>,
    },
    WorkerReply {
        worker_index: usize,
        task_id: TaskId,
        outcome: Result<TaskOutput, String>,
    },
    WorkerExited {
        index: usize,
        reason: String,
    },
    Respawn {
        index: usize,
    },
    Sweep,
    GetStats {
        reply: oneshot::Sender<PoolStats>,
    },
    Terminate {
        ack: oneshot::Sender<()>,
    },
}

/// A task handed to a worker and not yet completed, failed, or timed out
struct ActiveTask {
    worker_index: usize,
    started_at: Instant,
    reply: oneshot::Sender<crate::pool::Result<TaskOutput>>,
}

/// Channel and abort handle for one worker unit; `sender` is `None` while
/// the slot awaits a respawn after a crash
struct WorkerSlot {
    sender: Option<mpsc::UnboundedSender<WorkerRequest>>,
    unit: Option<AbortHandle>,
}

impl WorkerSlot {
    fn empty() -> Self {
        Self {
            sender: None,
            unit: None,
        }
    }

    fn is_live(&self) -> bool {
        self.sender.is_some()
    }

    fn terminate(&mut self) {
        if let Some(unit) = self.unit.take() {
            unit.abort();
        }
        self.sender = None;
    }
}

/// Owner of all pool state, driven by [`PoolEvent`]s on one channel.
///
/// Workers never share memory with the supervisor; they post replies into
/// the same event channel the heartbeat and watchdogs use, so dispatch
/// bookkeeping needs no locks.
pub(crate) struct Supervisor {
    config: PoolConfig,
    executor: Arc<dyn TaskExecutor>,
    registry: WorkerRegistry,
    queue: TaskQueue,
    active: HashMap<TaskId, ActiveTask>,
    slots: Vec<WorkerSlot>,
    events_tx: mpsc::UnboundedSender<PoolEvent>,
    heartbeat: Option<AbortHandle>,
    started_at: DateTime<Utc>,
}

impl Supervisor {
    pub fn new(
        config: PoolConfig,
        executor: Arc<dyn TaskExecutor>,
        events_tx: mpsc::UnboundedSender<PoolEvent>,
    ) -> Self {
        let workers = config.max_workers;
        Self {
            config,
            executor,
            registry: WorkerRegistry::new(workers),
            queue: TaskQueue::new(),
            active: HashMap::new(),
            slots: (0..workers).map(|_| WorkerSlot::empty()).collect(),
            events_tx,
            heartbeat: None,
            started_at: Utc::now(),
        }
    }

    /// Staff every slot and start the heartbeat monitor
    pub fn initialize(&mut self) {
        for index in 0..self.slots.len() {
            self.spawn_worker(index);
        }
        self.start_heartbeat();
        info!(workers = self.slots.len(), "worker pool initialized");
    }

    /// Drain the event channel until terminated
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<PoolEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                PoolEvent::Submit {
                    payload,
                    priority,
                    reply,
                } => self.handle_submit(payload, priority, reply),
                PoolEvent::WorkerReply {
                    worker_index,
                    task_id,
                    outcome,
                } => self.handle_reply(worker_index, task_id, outcome),
                PoolEvent::WorkerExited { index, reason } => self.handle_exit(index, reason),
                PoolEvent::Respawn { index } => self.handle_respawn(index),
                PoolEvent::Sweep => self.sweep(),
                PoolEvent::GetStats { reply } => {
                    let _ = reply.send(self.stats_snapshot());
                }
                PoolEvent::Terminate { ack } => {
                    self.shutdown();
                    let _ = ack.send(());
                    break;
                }
            }
        }
    }

    fn handle_submit(
        &mut self,
        payload: TaskPayload,
        priority: i32,
        reply: oneshot::Sender<crate::pool::Result<TaskOutput>>,
    ) {
        let task_id = Uuid::new_v4();
        match self.pick_worker() {
            Some(index) => {
                debug!(%task_id, kind = payload.kind(), worker = index, "dispatching task");
                self.dispatch(index, task_id, payload, reply);
            }
            None => {
                debug!(%task_id, kind = payload.kind(), priority, "queueing task, no capacity");
                self.queue.push(QueueEntry {
                    task_id,
                    payload,
                    priority,
                    reply,
                });
            }
        }
    }

    /// Least-loaded live slot under the admission limit, lowest index on ties
    fn pick_worker(&self) -> Option<usize> {
        let live: Vec<bool> = self.slots.iter().map(WorkerSlot::is_live).collect();
        self.registry.pick_worker(&live, self.config.per_worker_limit)
    }

    fn dispatch(
        &mut self,
        index: usize,
        task_id: TaskId,
        payload: TaskPayload,
        reply: oneshot::Sender<crate::pool::Result<TaskOutput>>,
    ) {
        self.registry.inc_load(index);
        self.active.insert(
            task_id,
            ActiveTask {
                worker_index: index,
                started_at: Instant::now(),
                reply,
            },
        );
        let delivered = self.slots[index]
            .sender
            .as_ref()
            .is_some_and(|tx| tx.send(WorkerRequest { task_id, payload }).is_ok());
        if !delivered {
            // The unit died between selection and send. The record stays;
            // the heartbeat sweep reclaims it like any other lost task.
            warn!(%task_id, worker = index, "worker unreachable, task awaits timeout reclamation");
        }
    }

    fn handle_reply(
        &mut self,
        worker_index: usize,
        task_id: TaskId,
        outcome: Result<TaskOutput, String>,
    ) {
        let Some(record) = self.active.remove(&task_id) else {
            // Reply for a task the sweep already failed; its record is gone.
            debug!(%task_id, worker = worker_index, "ignoring late reply");
            return;
        };
        let elapsed = record.started_at.elapsed();
        self.registry
            .record_completion(record.worker_index, elapsed, outcome.is_err());
        if let Err(ref message) = outcome {
            warn!(%task_id, worker = worker_index, error = %message, "task failed");
        }
        let _ = record.reply.send(outcome.map_err(PoolError::TaskFailed));
        self.drain_queue();
    }

    /// Fail every in-flight task past its deadline and free its slot
    fn sweep(&mut self) {
        let timeout = self.config.task_timeout;
        let expired: Vec<TaskId> = self
            .active
            .iter()
            .filter(|(_, record)| record.started_at.elapsed() > timeout)
            .map(|(id, _)| *id)
            .collect();
        if expired.is_empty() {
            return;
        }
        for task_id in expired {
            if let Some(record) = self.active.remove(&task_id) {
                let elapsed = record.started_at.elapsed();
                warn!(%task_id, worker = record.worker_index, elapsed_ms = elapsed.as_millis() as u64, "task timed out");
                self.registry.record_timeout(record.worker_index);
                let _ = record.reply.send(Err(PoolError::TaskTimeout { elapsed }));
            }
        }
        self.drain_queue();
    }

    /// Dispatch queued entries while capacity remains
    fn drain_queue(&mut self) {
        while !self.queue.is_empty() {
            let Some(index) = self.pick_worker() else {
                break;
            };
            let Some(entry) = self.queue.pop_next() else {
                break;
            };
            debug!(task_id = %entry.task_id, worker = index, priority = entry.priority, "dispatching queued task");
            self.dispatch(index, entry.task_id, entry.payload, entry.reply);
        }
    }

    /// A unit crashed: count the error, kill the remains, schedule a
    /// same-slot replacement after the restart backoff.
    ///
    /// Tasks active on the slot are not failed here; the heartbeat sweep
    /// is the only reclamation path, and the slot's load counter carries
    /// them until then.
    fn handle_exit(&mut self, index: usize, reason: String) {
        error!(worker = index, %reason, "worker unit crashed");
        self.registry.record_unit_error(index);
        self.slots[index].terminate();

        let events = self.events_tx.clone();
        let backoff = self.config.restart_backoff;
        tokio::spawn(async move {
            tokio::time::sleep(backoff).await;
            let _ = events.send(PoolEvent::Respawn { index });
        });
    }

    fn handle_respawn(&mut self, index: usize) {
        if self.slots[index].is_live() {
            return;
        }
        self.spawn_worker(index);
        info!(worker = index, "worker unit restarted");
        self.drain_queue();
    }

    fn spawn_worker(&mut self, index: usize) {
        let (tx, rx) = mpsc::unbounded_channel();
        let unit = tokio::spawn(worker::run(
            index,
            self.executor.clone(),
            rx,
            self.events_tx.clone(),
        ));
        let abort = unit.abort_handle();

        // Watchdog: report panic exits back into the event channel. Clean
        // exits (channel closed) and aborts are not crashes.
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = unit.await {
                if err.is_panic() {
                    let panic = err.into_panic();
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "worker panicked".to_string());
                    let _ = events.send(PoolEvent::WorkerExited { index, reason });
                }
            }
        });

        let slot = &mut self.slots[index];
        slot.sender = Some(tx);
        slot.unit = Some(abort);
    }

    fn start_heartbeat(&mut self) {
        let events = self.events_tx.clone();
        let interval = self.config.heartbeat_interval;
        let monitor = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // interval fires immediately; skip the initial tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if events.send(PoolEvent::Sweep).is_err() {
                    break;
                }
            }
        });
        self.heartbeat = Some(monitor.abort_handle());
    }

    fn stats_snapshot(&self) -> PoolStats {
        debug_assert_eq!(self.registry.total_load(), self.active.len());
        PoolStats {
            workers: self.registry.len(),
            active_tasks: self.active.len(),
            queued_tasks: self.queue.len(),
            worker_load: self.registry.load_vector(),
            worker_stats: self.registry.stats_snapshots(),
            started_at: self.started_at,
        }
    }

    /// Stop the heartbeat before tearing down units, then clear all state.
    ///
    /// Pending and in-flight callers observe their reply channels closing.
    fn shutdown(&mut self) {
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.abort();
        }
        for slot in &mut self.slots {
            slot.terminate();
        }
        self.queue.clear();
        self.active.clear();
        self.registry.clear();
        info!("worker pool terminated");
    }
}
