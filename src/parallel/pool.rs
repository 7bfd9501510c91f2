//! Rayon thread pool configuration for simulation workloads.
//!
//! Use [WorkerPool::install] to run a parallel Monte Carlo run with a fixed number of
//! threads, or rely on Rayon's default (all CPU cores).

use rayon::ThreadPoolBuilder;

use crate::error::{Result, SimError};

/// How many worker threads parallel trial execution uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a thread pool with this worker count. If
    /// [workers](WorkerPool::workers) is 0, uses the global Rayon pool. Otherwise builds a
    /// temporary pool with that many threads.
    pub fn install<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|err| SimError::configuration("workers", err.to_string()))?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pool_runs_on_requested_thread_count() {
        let threads = WorkerPool::with_workers(2)
            .install(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 2);
    }

    #[test]
    fn default_pool_runs_inline() {
        assert_eq!(WorkerPool::default_workers().install(|| 7).unwrap(), 7);
    }
}
