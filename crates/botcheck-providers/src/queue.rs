use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Bounded concurrency gate in front of the `TextClassifier` collaborator
/// (§5): callers that can't acquire a permit immediately observe `busy`
/// rather than queueing unboundedly.
pub struct ClassifierQueue {
    permits: Arc<Semaphore>,
}

impl ClassifierQueue {
    pub fn new(capacity: usize) -> Self {
        Self { permits: Arc::new(Semaphore::new(capacity)) }
    }

    /// Runs `task` if a slot is free, otherwise returns immediately with
    /// `Error::PermanentFailure("busy")` without running it.
    pub async fn try_run<F, Fut, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let permit = self.permits.clone().try_acquire_owned();
        match permit {
            Ok(_guard) => task().await,
            Err(_) => Err(Error::PermanentFailure("busy".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn a_free_slot_runs_the_task() {
        let queue = ClassifierQueue::new(1);
        let result = queue.try_run(|| async { Ok(42) }).await.unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn an_exhausted_queue_rejects_as_busy() {
        let queue = ClassifierQueue::new(1);
        let permits = queue.permits.clone();
        let _held = permits.try_acquire().unwrap();

        let result = queue.try_run(|| async { Ok(1) }).await;
        assert!(matches!(result, Err(Error::PermanentFailure(_))));
    }
}
