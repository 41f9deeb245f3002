use crate::executor::Task;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::fmt;

/// Scheduling priority. Higher values are dequeued first; the range is the
/// full `i32` and is not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(pub i32);

impl Priority {
    pub const LOW: Priority = Priority(-10);
    pub const NORMAL: Priority = Priority(0);
    pub const HIGH: Priority = Priority(10);

    pub fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Priority(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct PriorityTask {
    task: Task,
    sequence: u64,
}

impl PartialEq for PriorityTask {
    fn eq(&self, other: &Self) -> bool {
        self.task.priority == other.task.priority && self.sequence == other.sequence
    }
}

impl Eq for PriorityTask {}

impl PartialOrd for PriorityTask {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityTask {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // max-heap: higher priority first, then earlier insertion
        self.task
            .priority
            .cmp(&other.task.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Max-priority queue of tasks, FIFO among equal priorities.
///
/// Not synchronized on its own; it lives behind the mutex in
/// [`TaskQueue`](super::queue::TaskQueue).
#[derive(Debug, Default)]
pub(crate) struct PriorityQueue {
    heap: BinaryHeap<PriorityTask>,
    next_sequence: u64,
}

impl PriorityQueue {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(PriorityTask { task, sequence });
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.heap.pop().map(|pt| pt.task)
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<Priority> {
        self.heap.peek().map(|pt| pt.task.priority)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Remove every queued task, in no particular order.
    pub fn drain(&mut self) -> Vec<Task> {
        self.heap.drain().map(|pt| pt.task).collect()
    }
}
