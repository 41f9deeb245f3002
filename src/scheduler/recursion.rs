//! Per-thread nesting depth of pool-originated task execution.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Number of pool tasks currently executing on this thread, counting nested
/// ones. Zero on a thread that is not running a task.
pub fn current_depth() -> usize {
    DEPTH.with(|d| d.get())
}

/// Holds one level of depth for as long as it lives. Restores the counter
/// on drop, including during unwinding.
#[derive(Debug)]
pub(crate) struct DepthGuard {
    // Tied to the thread whose counter it bumped.
    _not_send: PhantomData<*const ()>,
}

impl DepthGuard {
    pub fn enter() -> Self {
        DEPTH.with(|d| d.set(d.get() + 1));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
