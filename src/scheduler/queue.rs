//! The shared, mutex-guarded task queue and its wake-up signal.

use super::priority::PriorityQueue;
use crate::executor::Task;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Priority queue plus the condition variable that signals "work available,
/// a task completed, or the pool is stopping".
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    heap: Mutex<PriorityQueue>,
    cond: Condvar,
    stopping: AtomicBool,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, PriorityQueue> {
        self.heap.lock()
    }

    /// Enqueue a task and wake every waiter. Hands the task back if the
    /// queue has been stopped.
    pub fn push(&self, task: Task) -> Result<(), Task> {
        let mut heap = self.heap.lock();
        if self.is_stopping() {
            return Err(task);
        }
        heap.push(task);
        self.cond.notify_all();
        Ok(())
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Set the stop flag and wake everyone so they observe it. The flag is
    /// set under the lock, so nothing can be popped once it is visible.
    pub fn stop(&self) {
        let _heap = self.heap.lock();
        self.stopping.store(true, Ordering::Release);
        self.cond.notify_all();
    }

    /// Broadcast under an already-held lock.
    pub fn notify_all(&self, _held: &MutexGuard<'_, PriorityQueue>) {
        self.cond.notify_all();
    }

    pub fn wait(&self, guard: &mut MutexGuard<'_, PriorityQueue>) {
        self.cond.wait(guard);
    }

    pub fn wait_for(&self, guard: &mut MutexGuard<'_, PriorityQueue>, timeout: Duration) {
        let _ = self.cond.wait_for(guard, timeout);
    }

    pub fn len(&self) -> usize {
        self.heap.lock().len()
    }

    /// Take every queued task out. The caller drops them outside the lock.
    pub fn drain(&self) -> Vec<Task> {
        self.heap.lock().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Priority;
    use std::sync::Arc;
    use std::thread;

    fn task(priority: i32) -> Task {
        Task::bind(Priority(priority), || ()).0
    }

    #[test]
    fn test_push_and_len() {
        let queue = TaskQueue::new();
        assert!(queue.push(task(1)).is_ok());
        assert!(queue.push(task(2)).is_ok());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.lock().peek(), Some(Priority(2)));
    }

    #[test]
    fn test_push_after_stop_is_rejected() {
        let queue = TaskQueue::new();
        queue.stop();
        assert!(queue.is_stopping());
        assert!(queue.push(task(0)).is_err());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_stop_waits_for_lock_holder() {
        let queue = Arc::new(TaskQueue::new());
        queue.push(task(0)).unwrap();

        let guard = queue.lock();
        let stopper = {
            let queue = queue.clone();
            thread::spawn(move || queue.stop())
        };
        thread::sleep(std::time::Duration::from_millis(20));

        // a lock holder that saw "not stopping" may still pop
        assert!(!queue.is_stopping());
        drop(guard);

        stopper.join().unwrap();
        assert!(queue.is_stopping());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_drain() {
        let queue = TaskQueue::new();
        for p in 0..3 {
            queue.push(task(p)).unwrap();
        }
        assert_eq!(queue.drain().len(), 3);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_push_wakes_waiter() {
        let queue = Arc::new(TaskQueue::new());
        let waiter = {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut guard = queue.lock();
                while guard.is_empty() {
                    queue.wait(&mut guard);
                }
                guard.pop().map(|t| t.priority)
            })
        };

        queue.push(task(9)).unwrap();
        assert_eq!(waiter.join().unwrap(), Some(Priority(9)));
    }

    #[test]
    fn test_stop_wakes_waiter() {
        let queue = Arc::new(TaskQueue::new());
        let waiter = {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut guard = queue.lock();
                while !queue.is_stopping() {
                    queue.wait(&mut guard);
                }
            })
        };

        queue.stop();
        waiter.join().unwrap();
    }
}
