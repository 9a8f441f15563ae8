use crate::pool::types::WorkerStatsSnapshot;
use std::time::Duration;

/// Cumulative counters for one worker slot
#[derive(Clone, Debug, Default)]
pub(crate) struct WorkerStats {
    pub tasks_completed: u64,
    pub total_time_ms: u64,
    pub errors: u64,
}

impl WorkerStats {
    /// Mean execution time over completed tasks, 0 when none completed
    pub fn average_task_time_ms(&self) -> f64 {
        if self.tasks_completed == 0 {
            0.0
        } else {
            self.total_time_ms as f64 / self.tasks_completed as f64
        }
    }

    /// Errors relative to completed work; 1.0 when a slot has only errored
    pub fn error_rate(&self) -> f64 {
        if self.tasks_completed > 0 {
            self.errors as f64 / self.tasks_completed as f64
        } else if self.errors > 0 {
            1.0
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> WorkerStatsSnapshot {
        WorkerStatsSnapshot {
            tasks_completed: self.tasks_completed,
            average_task_time_ms: self.average_task_time_ms(),
            errors: self.errors,
            error_rate: self.error_rate(),
        }
    }
}

/// Bookkeeping for one worker slot; mutated only by the supervisor task
#[derive(Clone, Debug, Default)]
pub(crate) struct WorkerState {
    pub current_load: usize,
    pub stats: WorkerStats,
}

/// Fixed-size array of worker slots with load and statistics tracking.
///
/// Owned exclusively by the supervisor; no other task reads or writes it,
/// which is what keeps the dispatch hot path lock-free.
pub(crate) struct WorkerRegistry {
    slots: Vec<WorkerState>,
}

impl WorkerRegistry {
    pub fn new(workers: usize) -> Self {
        Self {
            slots: vec![WorkerState::default(); workers],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn load(&self, index: usize) -> usize {
        self.slots[index].current_load
    }

    pub fn total_load(&self) -> usize {
        self.slots.iter().map(|s| s.current_load).sum()
    }

    /// Least-loaded slot among `live`, ties broken by lowest index.
    ///
    /// Returns `None` when no live slot is below `per_worker_limit`.
    pub fn pick_worker(&self, live: &[bool], per_worker_limit: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| live.get(*i).copied().unwrap_or(false))
            .min_by_key(|(i, state)| (state.current_load, *i))
            .filter(|(_, state)| state.current_load < per_worker_limit)
            .map(|(i, _)| i)
    }

    pub fn inc_load(&mut self, index: usize) {
        self.slots[index].current_load += 1;
    }

    /// Record a finished execution: load freed, time accounted, errors on failure
    pub fn record_completion(&mut self, index: usize, elapsed: Duration, failed: bool) {
        let slot = &mut self.slots[index];
        slot.current_load = slot.current_load.saturating_sub(1);
        slot.stats.tasks_completed += 1;
        slot.stats.total_time_ms += elapsed.as_millis() as u64;
        if failed {
            slot.stats.errors += 1;
        }
    }

    /// Record a heartbeat reclamation: load freed, error counted, no completion
    pub fn record_timeout(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.current_load = slot.current_load.saturating_sub(1);
        slot.stats.errors += 1;
    }

    /// Record a unit crash. The slot's load is deliberately left untouched;
    /// tasks lost in the crash are reclaimed by the timeout sweep.
    pub fn record_unit_error(&mut self, index: usize) {
        self.slots[index].stats.errors += 1;
    }

    pub fn load_vector(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.current_load).collect()
    }

    pub fn stats_snapshots(&self) -> Vec<WorkerStatsSnapshot> {
        self.slots.iter().map(|s| s.stats.snapshot()).collect()
    }

    /// Reset all load counters and statistics
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = WorkerState::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_worker_prefers_lowest_load_then_lowest_index() {
        let mut registry = WorkerRegistry::new(3);
        let live = vec![true, true, true];

        assert_eq!(registry.pick_worker(&live, 3), Some(0));

        registry.inc_load(0);
        assert_eq!(registry.pick_worker(&live, 3), Some(1));

        registry.inc_load(1);
        registry.inc_load(2);
        // All at load 1; tie falls back to index order.
        assert_eq!(registry.pick_worker(&live, 3), Some(0));
        assert_eq!(registry.total_load(), 3);
    }

    #[test]
    fn pick_worker_respects_limit() {
        let mut registry = WorkerRegistry::new(2);
        let live = vec![true, true];

        for _ in 0..3 {
            registry.inc_load(0);
            registry.inc_load(1);
        }
        assert_eq!(registry.pick_worker(&live, 3), None);
    }

    #[test]
    fn pick_worker_skips_dead_slots() {
        let registry = WorkerRegistry::new(2);
        assert_eq!(registry.pick_worker(&[false, true], 3), Some(1));
        assert_eq!(registry.pick_worker(&[false, false], 3), None);
    }

    #[test]
    fn average_task_time_is_total_over_completed() {
        let mut registry = WorkerRegistry::new(1);
        registry.inc_load(0);
        registry.record_completion(0, Duration::from_millis(10), false);
        registry.inc_load(0);
        registry.record_completion(0, Duration::from_millis(30), false);
        registry.inc_load(0);
        registry.record_completion(0, Duration::from_millis(20), false);

        let snapshot = &registry.stats_snapshots()[0];
        assert_eq!(snapshot.tasks_completed, 3);
        assert_eq!(snapshot.average_task_time_ms, 60.0 / 3.0);
        assert_eq!(snapshot.errors, 0);
        assert_eq!(snapshot.error_rate, 0.0);
    }

    #[test]
    fn failed_completion_counts_into_both_totals() {
        let mut registry = WorkerRegistry::new(1);
        registry.inc_load(0);
        registry.record_completion(0, Duration::from_millis(5), true);

        let snapshot = &registry.stats_snapshots()[0];
        assert_eq!(snapshot.tasks_completed, 1);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.error_rate, 1.0);
    }

    #[test]
    fn timeout_frees_load_without_completion() {
        let mut registry = WorkerRegistry::new(1);
        registry.inc_load(0);
        registry.record_timeout(0);

        assert_eq!(registry.load(0), 0);
        let snapshot = &registry.stats_snapshots()[0];
        assert_eq!(snapshot.tasks_completed, 0);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.error_rate, 1.0);
    }

    #[test]
    fn unit_error_leaves_load_untouched() {
        let mut registry = WorkerRegistry::new(1);
        registry.inc_load(0);
        registry.record_unit_error(0);

        assert_eq!(registry.load(0), 1);
        assert_eq!(registry.stats_snapshots()[0].errors, 1);
    }
}
