//! Consumer side of a task's result channel.

use super::panic_handler::PanicInfo;
use super::task::TaskId;
use crate::scheduler::Priority;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::fmt;

pub(crate) type Outcome<T> = Result<T, PanicInfo>;

/// Non-blocking view of a handle.
#[derive(Debug)]
pub(crate) enum HandleState<T> {
    Ready(Outcome<T>),
    Pending,
    /// The producer was dropped without writing: the task will never run.
    Abandoned,
}

/// Future-like handle to the result of a submitted task.
///
/// Retrieve the value with [`ThreadPool::wait_for_task`](crate::ThreadPool::wait_for_task).
/// A handle returned after the pool started shutting down never resolves;
/// waiting on it yields [`Error::Unavailable`](crate::Error::Unavailable).
#[must_use = "dropping a handle discards the task's result"]
pub struct TaskHandle<T> {
    id: TaskId,
    priority: Priority,
    receiver: Receiver<Outcome<T>>,
    inlined: bool,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(
        id: TaskId,
        priority: Priority,
        receiver: Receiver<Outcome<T>>,
        inlined: bool,
    ) -> Self {
        Self {
            id,
            priority,
            receiver,
            inlined,
        }
    }

    /// A handle with no producer behind it.
    pub(crate) fn abandoned(priority: Priority) -> Self {
        let (_, rx) = bounded(1);
        Self::new(TaskId::next(), priority, rx, false)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// True when the task ran synchronously inside `add_task` because the
    /// submitting thread was at the recursion limit.
    pub fn was_inlined(&self) -> bool {
        self.inlined
    }

    /// True once the outcome has been written.
    pub fn is_ready(&self) -> bool {
        !self.receiver.is_empty()
    }

    pub(crate) fn poll(&self) -> HandleState<T> {
        match self.receiver.try_recv() {
            Ok(outcome) => HandleState::Ready(outcome),
            Err(TryRecvError::Empty) => HandleState::Pending,
            Err(TryRecvError::Disconnected) => HandleState::Abandoned,
        }
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("ready", &self.is_ready())
            .field("inlined", &self.inlined)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abandoned_handle() {
        let handle: TaskHandle<i32> = TaskHandle::abandoned(Priority(5));
        assert!(!handle.is_ready());
        assert!(!handle.was_inlined());
        assert_eq!(handle.priority(), Priority(5));
        assert!(matches!(handle.poll(), HandleState::Abandoned));
    }

    #[test]
    fn test_pending_then_ready() {
        let (tx, rx) = bounded(1);
        let handle = TaskHandle::new(TaskId::next(), Priority::default(), rx, false);
        assert!(matches!(handle.poll(), HandleState::Pending));

        tx.send(Ok(String::from("value"))).unwrap();
        assert!(handle.is_ready());
        match handle.poll() {
            HandleState::Ready(Ok(v)) => assert_eq!(v, "value"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_debug_output() {
        let handle: TaskHandle<()> = TaskHandle::abandoned(Priority(2));
        let text = format!("{:?}", handle);
        assert!(text.contains("TaskHandle"));
        assert!(text.contains("ready: false"));
    }
}
