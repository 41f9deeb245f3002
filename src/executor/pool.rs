use super::handle::{HandleState, TaskHandle};
use super::stats::{PoolStats, PoolStatsSnapshot, Runner};
use super::task::Task;
use super::worker::{run_task, Worker, WorkerId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::scheduler::{current_depth, Priority, TaskQueue};
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(target_os = "linux")]
fn pin_thread_to_core(core_id: usize) {
    unsafe {
        let mut cpuset: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core_id, &mut cpuset);
        let result = libc::sched_setaffinity(
            0, // current thread
            std::mem::size_of::<libc::cpu_set_t>(),
            &cpuset,
        );
        if result != 0 {
            tracing::warn!(
                thread = thread::current().name().unwrap_or("unknown"),
                core_id,
                "failed to pin worker thread"
            );
        }
    }
}

/// Fixed-size pool of worker threads draining one shared priority queue.
///
/// Submissions from a thread that is already `max_recursion_depth` pool tasks
/// deep run inline instead of being queued. Callers blocked in
/// [`wait_for_task`](Self::wait_for_task) execute queued work while they wait,
/// so a task may wait on a sub-task it submitted even with a single worker.
///
/// Shutdown is fast rather than draining: tasks still queued when the pool
/// stops are dropped unexecuted, and waiting on their handles yields
/// [`Error::Unavailable`].
///
/// Share the pool through an `Arc` when tasks need to submit sub-tasks.
pub struct ThreadPool {
    queue: Arc<TaskQueue>,
    stats: Arc<PoolStats>,
    workers: Mutex<Vec<WorkerHandle>>,
    num_threads: usize,
    config: Config,
}

struct WorkerHandle {
    id: WorkerId,
    thread: JoinHandle<()>,
}

impl ThreadPool {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let num_threads = config.worker_threads();

        let pool = Self {
            queue: Arc::new(TaskQueue::new()),
            stats: Arc::new(PoolStats::default()),
            workers: Mutex::new(Vec::with_capacity(num_threads)),
            num_threads,
            config,
        };

        // On a spawn failure `pool` is dropped, which stops and joins the
        // workers started so far.
        for id in 0..num_threads {
            let thread = pool.spawn_worker(id)?;
            pool.workers.lock().push(WorkerHandle { id, thread });
        }

        tracing::debug!(
            workers = num_threads,
            max_recursion_depth = pool.config.max_recursion_depth,
            "thread pool started"
        );

        Ok(pool)
    }

    /// Pool with `n` workers and the default recursion limit.
    pub fn with_threads(n: usize) -> Result<Self> {
        Self::new(Config::builder().num_threads(n).build()?)
    }

    /// Pool sized to the hardware with the default recursion limit.
    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::default())
    }

    fn spawn_worker(&self, id: WorkerId) -> Result<JoinHandle<()>> {
        let worker = Worker::new(id, self.queue.clone(), self.stats.clone());
        let name = format!("{}-{}", self.config.thread_name_prefix, id);

        let mut builder = thread::Builder::new().name(name);
        if let Some(stack_size) = self.config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let pin_workers = self.config.pin_workers;
        let thread = builder.spawn(move || {
            #[cfg(target_os = "linux")]
            if pin_workers {
                pin_thread_to_core(worker.id % num_cpus::get().max(1));
            }
            #[cfg(not(target_os = "linux"))]
            let _ = pin_workers;

            worker.run();
        })?;

        Ok(thread)
    }

    /// Submit `f` at the default priority. See
    /// [`add_task_with_priority`](Self::add_task_with_priority).
    pub fn add_task<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.add_task_with_priority(Priority::default(), f)
    }

    /// Submit `f`; higher priorities are dequeued first.
    ///
    /// If the calling thread is already running `max_recursion_depth` nested
    /// pool tasks, `f` runs right here and the returned handle is already
    /// resolved. If the pool is stopping, nothing runs and the handle never
    /// resolves; waiting on it yields [`Error::Unavailable`].
    pub fn add_task_with_priority<P, F, T>(&self, priority: P, f: F) -> TaskHandle<T>
    where
        P: Into<Priority>,
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let priority = priority.into();

        if self.queue.is_stopping() {
            return self.reject(priority);
        }

        let depth = current_depth();
        if depth >= self.config.max_recursion_depth {
            let (handle, completion) = Task::run_inline(priority, f);
            tracing::trace!(task = ?handle.id(), depth, "recursion limit reached, ran inline");
            self.stats.record_inlined(completion);
            return handle;
        }

        let (task, handle) = Task::bind(priority, f);
        let id = task.id;
        match self.queue.push(task) {
            Ok(()) => {
                tracing::trace!(task = ?id, %priority, depth, "task queued");
                self.stats.record_queued();
                handle
            }
            // lost the race with shutdown; dropping the task abandons `handle`
            Err(_task) => {
                self.stats.record_rejected();
                tracing::warn!(task = ?id, "task submitted during shutdown will never run");
                handle
            }
        }
    }

    fn reject<T>(&self, priority: Priority) -> TaskHandle<T> {
        self.stats.record_rejected();
        let handle = TaskHandle::abandoned(priority);
        tracing::warn!(task = ?handle.id(), "task submitted after shutdown will never run");
        handle
    }

    /// Block until `handle` resolves, running queued tasks on this thread in
    /// the meantime.
    ///
    /// Returns the task's value, [`Error::TaskPanicked`] if it panicked, or
    /// [`Error::Unavailable`] if the pool stopped before it ran. The task
    /// being waited on gets no precedence: the caller helps with whatever is
    /// at the head of the queue.
    pub fn wait_for_task<T>(&self, handle: TaskHandle<T>) -> Result<T> {
        loop {
            match handle.poll() {
                HandleState::Ready(outcome) => return outcome.map_err(Error::TaskPanicked),
                HandleState::Abandoned => return Err(Error::Unavailable),
                HandleState::Pending => {}
            }

            let mut guard = self.queue.lock();

            // Completions notify under this lock, so a result written after
            // this check cannot be missed by the wait below.
            if handle.is_ready() {
                continue;
            }
            if self.queue.is_stopping() {
                return Err(Error::Unavailable);
            }

            match guard.pop() {
                Some(task) => {
                    tracing::trace!(task = ?task.id, waiting_on = ?handle.id(), "helping");
                    MutexGuard::unlocked(&mut guard, || run_task(task, &self.stats, Runner::Helper));
                    self.queue.notify_all(&guard);
                }
                None => self
                    .queue
                    .wait_for(&mut guard, self.config.helper_park_interval),
            }
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn max_recursion_depth(&self) -> usize {
        self.config.max_recursion_depth
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_stopping(&self) -> bool {
        self.queue.is_stopping()
    }

    /// Tasks queued and not yet picked up.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the pool: wake every blocked thread, join the workers and drop
    /// whatever is still queued. Idempotent.
    ///
    /// When the last reference to the pool is released from inside one of its
    /// own tasks, that worker is not joined; it exits after the task returns.
    pub fn shutdown(&self) {
        self.queue.stop();

        let workers: Vec<WorkerHandle> = self.workers.lock().drain(..).collect();
        let current = thread::current().id();
        let joined = !workers.is_empty();

        for worker in workers {
            if worker.thread.thread().id() == current {
                continue;
            }
            if worker.thread.join().is_err() {
                tracing::warn!(worker = worker.id, "worker thread panicked");
            }
        }

        // Dropped outside the queue lock: a task's captures may run arbitrary
        // destructors.
        let discarded = self.queue.drain();
        if !discarded.is_empty() {
            tracing::warn!(count = discarded.len(), "discarding queued tasks at shutdown");
            self.stats.record_discarded(discarded.len());
        }
        drop(discarded);

        if joined {
            tracing::debug!("thread pool shut down");
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("num_threads", &self.num_threads)
            .field("max_recursion_depth", &self.config.max_recursion_depth)
            .field("stopping", &self.is_stopping())
            .field("pending_tasks", &self.pending_tasks())
            .finish()
    }
}
