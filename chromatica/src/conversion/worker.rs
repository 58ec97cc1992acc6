use std::sync::Arc;

use crate::common::Result;

/// Caller-supplied pool of threads conversions may run on.
///
/// Cloning shares the same pool. The engine never spawns threads on its own;
/// everything parallel runs inside [`rayon::ThreadPool::install`].
#[derive(Debug, Clone)]
pub struct Worker {
    pool: Arc<rayon::ThreadPool>,
}

impl Worker {
    pub fn new(pool: rayon::ThreadPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn from_shared(pool: Arc<rayon::ThreadPool>) -> Self {
        Self { pool }
    }

    /// Builds a dedicated pool with `threads` threads.
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("chromatica-worker-{index}"))
            .build()?;
        Ok(Self::new(pool))
    }

    #[inline]
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `op` inside the pool and blocks until it returns.
    pub(crate) fn execute<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_inside_pool() {
        let worker = Worker::with_threads(3).unwrap();
        assert_eq!(worker.thread_count(), 3);
        let threads = worker.execute(rayon::current_num_threads);
        assert_eq!(threads, 3);
    }

    #[test]
    fn clones_share_pool() {
        let worker = Worker::with_threads(2).unwrap();
        let clone = worker.clone();
        assert!(Arc::ptr_eq(&worker.pool, &clone.pool));
    }
}
