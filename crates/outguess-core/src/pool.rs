//! Bounded worker pool for independent buffer jobs.
//!
//! Every codec operation is a pure CPU-bound function of its inputs, so
//! batches are fanned out over a dedicated rayon pool whose size caps how many
//! requests run at once.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, StegoError};

pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// A fixed size pool of worker threads.
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool with `workers` threads, at least one.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            log::warn!("refusing to build a worker pool without threads");
            return Err(StegoError::invalid_input("worker pool needs at least one thread"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("outguess-worker-{i}"))
            .build()
            .map_err(|e| StegoError::invalid_input(e.to_string()))?;

        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job` on every input, results in input order.
    pub fn map<I, O, F>(&self, inputs: Vec<I>, job: F) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> O + Sync + Send,
    {
        log::debug!("dispatching {} jobs to {} workers", inputs.len(), self.workers);
        self.pool
            .install(|| inputs.into_par_iter().map(&job).collect())
    }

    /// Run a single job on the pool and wait for it.
    pub fn run<O, F>(&self, job: F) -> O
    where
        O: Send,
        F: FnOnce() -> O + Send,
    {
        self.pool.install(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_map_preserves_order() {
        let pool = WorkerPool::new(4).unwrap();
        let out = pool.map((0..100).collect(), |x: u32| x * 2);
        assert_eq!(out, (0..100).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(StegoError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new(2).unwrap();
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        pool.map((0..32).collect::<Vec<u32>>(), |_| {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(2));
            running.fetch_sub(1, Ordering::SeqCst);
        });

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_run_on_pool() {
        let pool = WorkerPool::new(1).unwrap();
        let name = pool.run(|| std::thread::current().name().map(str::to_string));
        assert_eq!(name.as_deref(), Some("outguess-worker-0"));
    }
}
