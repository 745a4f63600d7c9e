//! Background worker pool for index builds and query execution.
//!
//! The coordinator never blocks the caller: index construction and text
//! queries run here and report back by taking the session lock themselves.
//! Queries outrank builds so a keystroke is never stuck behind a catalog
//! reindex of another generation.

use parking_lot::{Condvar, Mutex};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::error;

/// Priority of a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskPriority {
    /// Full-catalog index construction
    Index = 0,
    /// User-facing text query
    Query = 1,
}

/// Error returned when a task cannot be accepted.
#[derive(Debug)]
pub struct RejectedError;

impl std::fmt::Display for RejectedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "background worker queue rejected the task")
    }
}

impl std::error::Error for RejectedError {}

struct QueuedTask {
    priority: TaskPriority,
    sequence: u64,
    work: Box<dyn FnOnce() + Send>,
}

impl Eq for QueuedTask {}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

// Higher priority first; FIFO within a priority
impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then(other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct WorkerPoolInner {
    queue: Mutex<BinaryHeap<QueuedTask>>,
    work_ready: Condvar,
    idle: Condvar,
    shutdown: AtomicBool,
    sequence: AtomicU64,
    queued: AtomicUsize,
    running: AtomicUsize,
    max_queued: usize,
}

/// Fixed pool of worker threads with priority ordering.
pub struct WorkerPool {
    inner: Arc<WorkerPoolInner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawn `threads` workers, named `curator-worker-N`.
    pub fn new(threads: usize, max_queued: usize) -> Self {
        let inner = Arc::new(WorkerPoolInner {
            queue: Mutex::new(BinaryHeap::new()),
            work_ready: Condvar::new(),
            idle: Condvar::new(),
            shutdown: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
            queued: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            max_queued,
        });

        let mut workers = Vec::with_capacity(threads);
        for n in 0..threads {
            let inner = Arc::clone(&inner);
            let handle = std::thread::Builder::new()
                .name(format!("curator-worker-{}", n))
                .spawn(move || worker_loop(&inner))
                .expect("failed to spawn curator worker thread");
            workers.push(handle);
        }

        Self {
            inner,
            workers: Mutex::new(workers),
        }
    }

    /// Queue a task.
    ///
    /// Returns `Err(RejectedError)` when the queue is full or the pool has
    /// been shut down — a rejected task will never run.
    pub fn submit(
        &self,
        priority: TaskPriority,
        work: impl FnOnce() + Send + 'static,
    ) -> Result<(), RejectedError> {
        if self.inner.shutdown.load(AtomicOrdering::Acquire) {
            return Err(RejectedError);
        }
        if self.inner.queued.load(AtomicOrdering::Acquire) >= self.inner.max_queued {
            return Err(RejectedError);
        }

        let task = QueuedTask {
            priority,
            sequence: self.inner.sequence.fetch_add(1, AtomicOrdering::Relaxed),
            work: Box::new(work),
        };

        {
            let mut queue = self.inner.queue.lock();
            queue.push(task);
            self.inner.queued.fetch_add(1, AtomicOrdering::Release);
        }
        self.inner.work_ready.notify_one();
        Ok(())
    }

    /// Block until every queued and running task has finished.
    ///
    /// Tasks submitted by running tasks are waited for too. Workers stay
    /// alive afterwards.
    pub fn drain(&self) {
        let mut queue = self.inner.queue.lock();
        while self.inner.queued.load(AtomicOrdering::Acquire) > 0
            || self.inner.running.load(AtomicOrdering::Acquire) > 0
        {
            self.inner.idle.wait(&mut queue);
        }
    }

    /// Finish remaining tasks, stop the workers and join them. Idempotent.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, AtomicOrdering::Release);

        // The queue lock serializes against a worker sitting between its
        // shutdown check and its condvar wait, so no wakeup is lost.
        {
            let _queue = self.inner.queue.lock();
            self.inner.work_ready.notify_all();
        }

        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Decrements `running` and wakes drain waiters on drop, so the bookkeeping
/// survives a panicking task — otherwise `drain()` would hang forever.
struct RunningGuard<'a> {
    inner: &'a WorkerPoolInner,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        let was_running = self.inner.running.fetch_sub(1, AtomicOrdering::Release);
        if was_running == 1 && self.inner.queued.load(AtomicOrdering::Acquire) == 0 {
            let _queue = self.inner.queue.lock();
            self.inner.idle.notify_all();
        }
    }
}

fn worker_loop(inner: &WorkerPoolInner) {
    loop {
        let task = {
            let mut queue = inner.queue.lock();
            loop {
                if let Some(task) = queue.pop() {
                    inner.queued.fetch_sub(1, AtomicOrdering::Release);
                    inner.running.fetch_add(1, AtomicOrdering::Release);
                    break task;
                }
                if inner.shutdown.load(AtomicOrdering::Acquire) {
                    return;
                }
                inner.work_ready.wait(&mut queue);
            }
        };

        let _guard = RunningGuard { inner };

        // Run outside the lock; a panicking task must not kill the worker.
        if std::panic::catch_unwind(std::panic::AssertUnwindSafe(task.work)).is_err() {
            error!("background task panicked");
        }
    }
}
