//! Scheduling collaborators for asynchronous procedure bodies.
//!
//! Future and promise procedures hand their body to a [`Spawn`]
//! implementation, which must run it exactly once on some thread. Two are
//! provided:
//! - [`BackgroundScheduler`]: fixed pool of named workers with a FIFO queue
//!   and backpressure
//! - [`ThreadPerTask`]: one OS thread per body
//!
//! A refused submission is reported synchronously as `Error::Scheduler`.

use crate::config::EngineConfig;
use once_cell::sync::Lazy;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tacit_core::{Error, Result};
use tracing::{error, warn};

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run a [`Task`] on another thread.
pub trait Spawn: Send + Sync {
    /// Accept `task` for execution.
    ///
    /// On `Ok` the task runs exactly once. On `Err` it never runs.
    fn spawn(&self, task: Task) -> Result<()>;
}

/// Process-wide scheduler used by types created without an explicit one.
static DEFAULT_SCHEDULER: Lazy<Arc<dyn Spawn>> = Lazy::new(|| {
    match BackgroundScheduler::from_config(&EngineConfig::default()) {
        Ok(scheduler) => Arc::new(scheduler),
        Err(e) => {
            warn!(error = %e, "falling back to thread-per-task scheduling");
            Arc::new(ThreadPerTask)
        }
    }
});

/// Shared handle to the default scheduler.
pub fn default_scheduler() -> Arc<dyn Spawn> {
    Arc::clone(&DEFAULT_SCHEDULER)
}

/// Scheduler metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Number of tasks waiting in the queue.
    pub queue_depth: usize,
    /// Number of tasks currently being executed by workers.
    pub active_tasks: usize,
    /// Total number of tasks completed since scheduler creation.
    pub tasks_completed: u64,
    /// Number of worker threads.
    pub worker_count: usize,
}

struct SchedulerInner {
    queue: Mutex<VecDeque<Task>>,
    work_ready: Condvar,
    drain_cond: Condvar,
    shutdown: AtomicBool,
    queue_depth: AtomicUsize,
    active_tasks: AtomicUsize,
    max_queue_depth: usize,
    tasks_completed: AtomicU64,
}

impl SchedulerInner {
    fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        // Notify under the queue lock so a worker between its shutdown
        // check and its wait() cannot miss the wakeup.
        let _queue = self.queue.lock();
        self.work_ready.notify_all();
    }
}

/// Fixed pool of worker threads running tasks in submission order.
pub struct BackgroundScheduler {
    inner: Arc<SchedulerInner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    num_threads: usize,
}

impl BackgroundScheduler {
    /// Create a scheduler with `num_threads` workers named `tacit-worker-N`.
    pub fn new(num_threads: usize, max_queue_depth: usize) -> Result<Self> {
        Self::from_config(&EngineConfig {
            worker_threads: num_threads,
            max_queue_depth,
            ..EngineConfig::default()
        })
    }

    /// Create a scheduler sized and named by `config`.
    ///
    /// # Errors
    ///
    /// `Error::Config` for an invalid config, `Error::Scheduler` if a worker
    /// thread cannot be spawned. Workers already started are shut down
    /// before returning.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let inner = Arc::new(SchedulerInner {
            queue: Mutex::new(VecDeque::new()),
            work_ready: Condvar::new(),
            drain_cond: Condvar::new(),
            shutdown: AtomicBool::new(false),
            queue_depth: AtomicUsize::new(0),
            active_tasks: AtomicUsize::new(0),
            max_queue_depth: config.max_queue_depth,
            tasks_completed: AtomicU64::new(0),
        });

        let mut workers = Vec::with_capacity(config.worker_threads);
        for i in 0..config.worker_threads {
            let inner_clone = Arc::clone(&inner);
            let spawned = std::thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, i))
                .spawn(move || worker_loop(&inner_clone));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    inner.signal_shutdown();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(Error::scheduler(format!(
                        "failed to spawn worker thread: {}",
                        e
                    )));
                }
            }
        }

        Ok(Self {
            inner,
            workers: Mutex::new(workers),
            num_threads: config.worker_threads,
        })
    }

    /// Submit work to the pool.
    ///
    /// # Errors
    ///
    /// `Error::Scheduler` if the queue is at capacity or the scheduler has
    /// been shut down.
    pub fn submit(&self, work: impl FnOnce() + Send + 'static) -> Result<()> {
        // Workers have been joined after shutdown; the task would never run
        if self.inner.shutdown.load(Ordering::Acquire) {
            return Err(Error::scheduler("scheduler is shut down"));
        }

        {
            let mut queue = self.inner.queue.lock();
            if queue.len() >= self.inner.max_queue_depth {
                return Err(Error::scheduler(format!(
                    "queue is full ({} tasks)",
                    self.inner.max_queue_depth
                )));
            }
            queue.push_back(Box::new(work));
            self.inner.queue_depth.fetch_add(1, Ordering::Release);
        }

        self.inner.work_ready.notify_one();
        Ok(())
    }

    /// Block until all queued and in-flight tasks have completed.
    ///
    /// Workers keep running afterwards.
    pub fn drain(&self) {
        let mut queue = self.inner.queue.lock();
        while self.inner.queue_depth.load(Ordering::Acquire) > 0
            || self.inner.active_tasks.load(Ordering::Acquire) > 0
        {
            self.inner.drain_cond.wait(&mut queue);
        }
    }

    /// Signal workers to exit and join them.
    ///
    /// Queued tasks still run before the workers exit. Idempotent.
    pub fn shutdown(&self) {
        self.inner.signal_shutdown();

        let current = std::thread::current().id();
        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            // The last reference may be released by a task on one of our own
            // workers; that worker exits on its own once the task returns.
            if handle.thread().id() != current {
                let _ = handle.join();
            }
        }
    }

    /// Return a snapshot of scheduler metrics.
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            queue_depth: self.inner.queue_depth.load(Ordering::Relaxed),
            active_tasks: self.inner.active_tasks.load(Ordering::Relaxed),
            tasks_completed: self.inner.tasks_completed.load(Ordering::Relaxed),
            worker_count: self.num_threads,
        }
    }
}

impl Spawn for BackgroundScheduler {
    fn spawn(&self, task: Task) -> Result<()> {
        self.submit(task)
    }
}

impl Drop for BackgroundScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for BackgroundScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundScheduler")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Runs every task on a freshly spawned OS thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPerTask;

impl Spawn for ThreadPerTask {
    fn spawn(&self, task: Task) -> Result<()> {
        std::thread::Builder::new()
            .name("tacit-task".to_string())
            .spawn(task)
            .map(|_| ())
            .map_err(|e| Error::scheduler(format!("failed to spawn thread: {}", e)))
    }
}

/// Decrements `active_tasks` and wakes drain waiters on drop, panics included.
struct ActiveTaskGuard<'a> {
    inner: &'a SchedulerInner,
}

impl Drop for ActiveTaskGuard<'_> {
    fn drop(&mut self) {
        let prev_active = self.inner.active_tasks.fetch_sub(1, Ordering::Release);
        self.inner.tasks_completed.fetch_add(1, Ordering::Relaxed);

        // drain() checks its condition under the queue lock, so notify under it too
        if prev_active == 1 && self.inner.queue_depth.load(Ordering::Acquire) == 0 {
            let _queue = self.inner.queue.lock();
            self.inner.drain_cond.notify_all();
        }
    }
}

fn worker_loop(inner: &SchedulerInner) {
    loop {
        let task = {
            let mut queue = inner.queue.lock();
            loop {
                if let Some(task) = queue.pop_front() {
                    inner.queue_depth.fetch_sub(1, Ordering::Release);
                    inner.active_tasks.fetch_add(1, Ordering::Release);
                    break task;
                }
                if inner.shutdown.load(Ordering::Acquire) {
                    return;
                }
                inner.work_ready.wait(&mut queue);
            }
        };

        let _guard = ActiveTaskGuard { inner };

        // A panicking task must not take the worker down with it
        if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)) {
            error!(
                "scheduled task panicked: {:?}",
                e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
            );
        }
    }
}
