//! Bounded worker pool.
//!
//! A semaphore gates task spawn into a `JoinSet`: the submitting side waits
//! for a free permit before spawning, so at most `concurrency` jobs run at
//! once. `drain` is the barrier between phases; it returns exactly one entry
//! per submitted job.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

pub(crate) struct WorkerPool<T> {
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<T>,
    submitted: usize,
}

impl<T: Send + 'static> WorkerPool<T> {
    pub(crate) fn new(concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            tasks: JoinSet::new(),
            submitted: 0,
        }
    }

    /// Wait for a free worker slot, then start `job` on it.
    pub(crate) async fn submit<F>(&mut self, job: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        // The semaphore is never closed, so acquiring only ever waits.
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.ok();
        self.tasks.spawn(async move {
            let _permit = permit;
            job.await
        });
        self.submitted += 1;
    }

    pub(crate) fn submitted(&self) -> usize {
        self.submitted
    }

    /// Wait for every submitted job to finish.
    pub(crate) async fn drain(mut self) -> Vec<Result<T, JoinError>> {
        let mut results = Vec::with_capacity(self.submitted);
        while let Some(result) = self.tasks.join_next().await {
            results.push(result);
        }
        debug_assert_eq!(results.len(), self.submitted);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_drain_returns_one_result_per_job() {
        let mut pool = WorkerPool::new(3);
        for n in 0..10usize {
            pool.submit(async move { n * 2 }).await;
        }
        assert_eq!(pool.submitted(), 10);

        let mut values: Vec<usize> = pool.drain().await.into_iter().map(|r| r.unwrap()).collect();
        values.sort_unstable();

        assert_eq!(values, (0..10).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bound() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut pool = WorkerPool::new(2);

        for _ in 0..12 {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            pool.submit(async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            })
            .await;
        }
        pool.drain().await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_makes_progress() {
        let mut pool = WorkerPool::new(0);
        pool.submit(async { 1 }).await;

        assert_eq!(pool.drain().await.len(), 1);
    }

    #[tokio::test]
    async fn test_panicking_job_is_reported() {
        let mut pool: WorkerPool<()> = WorkerPool::new(2);
        pool.submit(async { panic!("worker blew up") }).await;
        pool.submit(async {}).await;

        let results = pool.drain().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }
}
