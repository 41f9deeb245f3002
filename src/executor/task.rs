//! Task representation and execution.

use super::handle::TaskHandle;
use super::panic_handler;
use crate::scheduler::Priority;
use crossbeam_channel::bounded;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// How a thunk finished. The outcome itself has already been written to the
/// task's handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    Finished,
    Panicked,
}

type Thunk = Box<dyn FnOnce() -> Completion + Send + 'static>;

/// Internal task representation. Owns the user closure and the producer side
/// of its result channel.
pub(crate) struct Task {
    pub(crate) id: TaskId,
    pub(crate) priority: Priority,
    pub(crate) spawn_time: Instant,
    func: Thunk,
}

impl Task {
    /// Wrap `f` into a deferred task and return it together with the handle
    /// that will observe its outcome.
    pub fn bind<F, T>(priority: Priority, f: F) -> (Self, TaskHandle<T>)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let id = TaskId::next();
        let (tx, rx) = bounded(1);

        let func: Thunk = Box::new(move || {
            let outcome = panic_handler::capture(id, f);
            let completion = match outcome {
                Ok(_) => Completion::Finished,
                Err(_) => Completion::Panicked,
            };
            // The receiver may already be gone if the caller dropped its handle.
            let _ = tx.send(outcome);
            completion
        });

        let task = Task {
            id,
            priority,
            spawn_time: Instant::now(),
            func,
        };

        (task, TaskHandle::new(id, priority, rx, false))
    }

    /// Run `f` on the calling thread and return an already-resolved handle.
    pub fn run_inline<F, T>(priority: Priority, f: F) -> (TaskHandle<T>, Completion)
    where
        F: FnOnce() -> T,
    {
        let id = TaskId::next();
        let (tx, rx) = bounded(1);

        let outcome = panic_handler::capture(id, f);
        let completion = match outcome {
            Ok(_) => Completion::Finished,
            Err(_) => Completion::Panicked,
        };
        // Capacity is one and the receiver is alive, so this cannot block or fail.
        let _ = tx.send(outcome);

        (TaskHandle::new(id, priority, rx, true), completion)
    }

    /// Execute the task
    pub fn execute(self) -> Completion {
        (self.func)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("spawn_time", &self.spawn_time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::handle::HandleState;

    #[test]
    fn test_task_ids_are_unique() {
        let a = TaskId::next();
        let b = TaskId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_bound_task_resolves_on_execute() {
        let (task, handle) = Task::bind(Priority(3), || 6 * 7);
        assert!(!handle.is_ready());
        assert_eq!(handle.priority(), Priority(3));
        assert_eq!(task.id, handle.id());

        assert_eq!(task.execute(), Completion::Finished);
        assert!(handle.is_ready());
        match handle.poll() {
            HandleState::Ready(Ok(v)) => assert_eq!(v, 42),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_bound_task_captures_panic() {
        let (task, handle) = Task::bind(Priority::default(), || -> u32 { panic!("nope") });
        assert_eq!(task.execute(), Completion::Panicked);
        match handle.poll() {
            HandleState::Ready(Err(info)) => assert_eq!(info.message, "nope"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_dropped_task_abandons_handle() {
        let (task, handle) = Task::bind(Priority::default(), || ());
        drop(task);
        assert!(matches!(handle.poll(), HandleState::Abandoned));
    }

    #[test]
    fn test_inline_is_ready_immediately() {
        let (handle, completion) = Task::run_inline(Priority(1), || "done");
        assert_eq!(completion, Completion::Finished);
        assert!(handle.was_inlined());
        assert!(handle.is_ready());
    }

    #[test]
    fn test_execute_ignores_dropped_handle() {
        let (task, handle) = Task::bind(Priority::default(), || 1);
        drop(handle);
        assert_eq!(task.execute(), Completion::Finished);
    }
}
