//! depth-pool - a priority-ordered thread pool with bounded recursion
//!
//! A fixed set of worker threads drains one shared max-priority queue. Every
//! submission returns a [`TaskHandle`]; [`ThreadPool::wait_for_task`] turns
//! the waiting thread into a temporary worker, so tasks can submit and wait
//! on sub-tasks without deadlocking the pool.
//!
//! # Quick Start
//!
//! ```
//! use depth_pool::prelude::*;
//! use std::sync::Arc;
//!
//! let pool = Arc::new(ThreadPool::with_threads(2).unwrap());
//!
//! let low = pool.add_task(|| 4);
//! let high = pool.add_task_with_priority(10, || 9);
//! assert_eq!(pool.wait_for_task(low).unwrap(), 4);
//! assert_eq!(pool.wait_for_task(high).unwrap(), 9);
//!
//! // tasks may submit and wait on their own sub-tasks
//! let inner = pool.clone();
//! let outer = pool.add_task(move || {
//!     let child = inner.add_task(|| 20);
//!     inner.wait_for_task(child).unwrap() + 1
//! });
//! assert_eq!(pool.wait_for_task(outer).unwrap(), 21);
//! ```
//!
//! # Behavior
//!
//! - **Priorities**: higher [`Priority`] values are dequeued first; equal
//!   priorities run in submission order. Priority is fixed at submission.
//! - **Recursion limit**: a thread already running `max_recursion_depth`
//!   nested pool tasks executes further submissions inline, returning an
//!   already-resolved handle.
//! - **Failures**: a panicking task is caught and reported to its own handle
//!   as [`Error::TaskPanicked`]; the worker keeps running.
//! - **Shutdown**: dropping the pool (or calling [`ThreadPool::shutdown`])
//!   joins the workers and discards queued tasks. Waiting on a task that never
//!   ran, or submitting after shutdown, yields [`Error::Unavailable`].

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod scheduler;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{PanicInfo, PoolStatsSnapshot, TaskHandle, TaskId, ThreadPool};
pub use scheduler::{current_depth, Priority};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_integer() {
        let pool = ThreadPool::with_threads(1).unwrap();
        let handle = pool.add_task_with_priority(-7, || "ok");
        assert_eq!(handle.priority(), Priority(-7));
        assert_eq!(pool.wait_for_task(handle).unwrap(), "ok");
    }

    #[test]
    fn test_result_values_pass_through() {
        let pool = ThreadPool::with_threads(1).unwrap();
        let handle = pool.add_task(|| "12x".parse::<u32>());
        let inner = pool.wait_for_task(handle).unwrap();
        assert!(inner.is_err());
    }

    #[test]
    fn test_defaults() {
        let pool = ThreadPool::with_defaults().unwrap();
        assert_eq!(pool.num_threads(), num_cpus::get().max(1));
        assert_eq!(pool.max_recursion_depth(), 5);
    }
}
