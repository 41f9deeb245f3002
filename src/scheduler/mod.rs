//! Task scheduling subsystem.
//!
//! Decides the order in which queued tasks run and whether a submission is
//! queued at all: a shared max-priority queue guarded by one mutex and
//! condition variable, and a per-thread recursion counter that diverts deeply
//! nested submissions to inline execution.

pub mod priority;
pub(crate) mod queue;
pub mod recursion;

pub use priority::Priority;
pub use recursion::current_depth;

pub(crate) use queue::TaskQueue;
pub(crate) use recursion::DepthGuard;
