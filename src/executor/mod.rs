//! Task execution infrastructure.
//!
//! This module provides the core task execution primitives: task records and
//! their result handles, worker threads, and the thread pool that ties them
//! to the scheduler.

pub mod handle;
pub mod panic_handler;
pub mod pool;
pub mod stats;
pub mod task;
pub mod worker;

pub use handle::TaskHandle;
pub use panic_handler::PanicInfo;
pub use pool::ThreadPool;
pub use stats::PoolStatsSnapshot;
pub use task::TaskId;

pub(crate) use task::Task;
