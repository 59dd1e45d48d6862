use crate::cache::{CacheKey, ClassificationCache};
use crate::queue::ClassifierQueue;
use async_trait::async_trait;
use botcheck_core::TextClassifier;
use botcheck_types::{Error, Result, TextClassification};
use std::sync::Arc;

/// Decorates a `TextClassifier` with the §5 concurrency model: a content-hash
/// cache with single-flight coalescing in front of a bounded work queue.
/// Callers past the queue's capacity observe `busy` rather than queueing
/// unboundedly.
pub struct CachedClassifier {
    inner: Arc<dyn TextClassifier>,
    cache: ClassificationCache,
    queue: ClassifierQueue,
}

impl CachedClassifier {
    pub fn new(inner: Arc<dyn TextClassifier>, cache_capacity: usize, cache_ttl_s: u64, queue_capacity: usize) -> Self {
        Self {
            inner,
            cache: ClassificationCache::new(cache_capacity, cache_ttl_s),
            queue: ClassifierQueue::new(queue_capacity),
        }
    }
}

#[async_trait]
impl TextClassifier for CachedClassifier {
    async fn classify(&self, question_text: &str, response_text: &str) -> Result<TextClassification> {
        let key = CacheKey::new(question_text, response_text);
        let inner = self.inner.clone();
        let question_text = question_text.to_string();
        let response_text = response_text.to_string();
        let queue = &self.queue;

        self.cache
            .get_or_fetch(key, || async move {
                queue
                    .try_run(|| async move {
                        inner.classify(&question_text, &response_text).await.map_err(|e| crate::Error::PermanentFailure(e.to_string()))
                    })
                    .await
            })
            .await
            .map_err(|e| Error::ClassifierUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StubClassifier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn repeated_identical_calls_hit_the_cache_once() {
        let stub = StubClassifier::heuristic();
        let cached = CachedClassifier::new(Arc::new(stub), 100, 60, 8);

        let a = cached.classify("q", "a perfectly reasonable answer").await.unwrap();
        let b = cached.classify("q", "a perfectly reasonable answer").await.unwrap();
        assert_eq!(a.quality, b.quality);
    }

    #[tokio::test]
    async fn distinct_pairs_are_not_coalesced() {
        let calls = Arc::new(AtomicUsize::new(0));
        struct Counting(Arc<AtomicUsize>);

        #[async_trait]
        impl TextClassifier for Counting {
            async fn classify(&self, _q: &str, _r: &str) -> Result<TextClassification> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(TextClassification { p_gibberish: 0.0, p_copy_paste: 0.0, p_irrelevant: 0.0, p_generic: 0.0, quality: 100.0 })
            }
        }

        let cached = CachedClassifier::new(Arc::new(Counting(calls.clone())), 100, 60, 8);
        cached.classify("q", "one").await.unwrap();
        cached.classify("q", "two").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
