// worker thread stuff
use super::stats::{PoolStats, Runner};
use super::task::Task;
use crate::scheduler::{DepthGuard, TaskQueue};
use parking_lot::MutexGuard;
use std::sync::Arc;

pub type WorkerId = usize;

pub(crate) struct Worker {
    pub id: WorkerId,
    queue: Arc<TaskQueue>,
    stats: Arc<PoolStats>,
}

impl Worker {
    pub fn new(id: WorkerId, queue: Arc<TaskQueue>, stats: Arc<PoolStats>) -> Self {
        Self { id, queue, stats }
    }

    // main loop
    pub fn run(&self) {
        tracing::debug!(worker = self.id, "worker started");

        let mut guard = self.queue.lock();
        loop {
            // pending tasks are left behind once stopping is set
            if self.queue.is_stopping() {
                break;
            }

            match guard.pop() {
                Some(task) => {
                    MutexGuard::unlocked(&mut guard, || {
                        run_task(task, &self.stats, Runner::Worker)
                    });
                    self.queue.notify_all(&guard);
                }
                None => self.queue.wait(&mut guard),
            }
        }
        drop(guard);

        tracing::debug!(worker = self.id, "worker exiting");
    }
}

/// Execute one popped task on the current thread, one level deeper.
pub(crate) fn run_task(task: Task, stats: &PoolStats, runner: Runner) {
    let id = task.id;
    let waited = task.spawn_time.elapsed();

    let completion = {
        let _depth = DepthGuard::enter();
        task.execute()
    };

    tracing::trace!(task = ?id, ?runner, ?waited, ?completion, "task finished");
    stats.record_executed(runner, completion);
}
