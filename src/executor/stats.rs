use super::task::Completion;
use std::sync::atomic::{AtomicU64, Ordering};

/// Who ran a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Runner {
    Worker,
    /// A caller blocked in `wait_for_task`.
    Helper,
}

// pool-wide counters
#[derive(Debug, Default)]
pub(crate) struct PoolStats {
    queued: AtomicU64,
    executed_by_workers: AtomicU64,
    executed_by_helpers: AtomicU64,
    inlined: AtomicU64,
    panicked: AtomicU64,
    rejected: AtomicU64,
    discarded: AtomicU64,
}

impl PoolStats {
    pub fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_executed(&self, runner: Runner, completion: Completion) {
        match runner {
            Runner::Worker => self.executed_by_workers.fetch_add(1, Ordering::Relaxed),
            Runner::Helper => self.executed_by_helpers.fetch_add(1, Ordering::Relaxed),
        };
        self.record_completion(completion);
    }

    pub fn record_inlined(&self, completion: Completion) {
        self.inlined.fetch_add(1, Ordering::Relaxed);
        self.record_completion(completion);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded(&self, count: usize) {
        self.discarded.fetch_add(count as u64, Ordering::Relaxed);
    }

    fn record_completion(&self, completion: Completion) {
        if completion == Completion::Panicked {
            self.panicked.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            tasks_queued: self.queued.load(Ordering::Relaxed),
            executed_by_workers: self.executed_by_workers.load(Ordering::Relaxed),
            executed_by_helpers: self.executed_by_helpers.load(Ordering::Relaxed),
            tasks_inlined: self.inlined.load(Ordering::Relaxed),
            tasks_panicked: self.panicked.load(Ordering::Relaxed),
            tasks_rejected: self.rejected.load(Ordering::Relaxed),
            tasks_discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a pool's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStatsSnapshot {
    /// Tasks accepted into the queue.
    pub tasks_queued: u64,
    pub executed_by_workers: u64,
    /// Queued tasks run by callers while they waited on another handle.
    pub executed_by_helpers: u64,
    /// Tasks run synchronously because of the recursion limit.
    pub tasks_inlined: u64,
    pub tasks_panicked: u64,
    /// Submissions refused because the pool was stopping.
    pub tasks_rejected: u64,
    /// Queued tasks dropped unexecuted at shutdown.
    pub tasks_discarded: u64,
}

impl PoolStatsSnapshot {
    /// Every task that actually ran, by any path.
    pub fn tasks_executed(&self) -> u64 {
        self.executed_by_workers + self.executed_by_helpers + self.tasks_inlined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = PoolStats::default();
        stats.record_queued();
        stats.record_queued();
        stats.record_executed(Runner::Worker, Completion::Finished);
        stats.record_executed(Runner::Helper, Completion::Panicked);
        stats.record_inlined(Completion::Finished);
        stats.record_rejected();
        stats.record_discarded(3);

        let snap = stats.snapshot();
        assert_eq!(snap.tasks_queued, 2);
        assert_eq!(snap.executed_by_workers, 1);
        assert_eq!(snap.executed_by_helpers, 1);
        assert_eq!(snap.tasks_inlined, 1);
        assert_eq!(snap.tasks_panicked, 1);
        assert_eq!(snap.tasks_rejected, 1);
        assert_eq!(snap.tasks_discarded, 3);
        assert_eq!(snap.tasks_executed(), 3);
    }
}
