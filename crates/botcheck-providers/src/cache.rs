use botcheck_types::TextClassification;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Content-addressed cache key over `(normalized_question, normalized_response)`
/// (§4.3). Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(question_text: &str, response_text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalize(question_text).as_bytes());
        hasher.update(b"\0");
        hasher.update(normalize(response_text).as_bytes());
        CacheKey(format!("{:x}", hasher.finalize()))
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

struct Entry {
    value: TextClassification,
    created_at: DateTime<Utc>,
}

/// Content-hash cache over classifier results with per-key single-flight:
/// concurrent calls for the same `(question, response)` pair block on one
/// underlying classifier invocation instead of firing N identical requests
/// (§5, §8 cache key law).
pub struct ClassificationCache {
    entries: RwLock<HashMap<CacheKey, Entry>>,
    locks: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    ttl: Duration,
    capacity: usize,
}

impl ClassificationCache {
    pub fn new(capacity: usize, ttl_s: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(ttl_s as i64),
            capacity,
        }
    }

    async fn get(&self, key: &CacheKey) -> Option<TextClassification> {
        let entries = self.entries.read().await;
        entries.get(key).and_then(|entry| {
            if Utc::now() - entry.created_at < self.ttl {
                Some(entry.value)
            } else {
                None
            }
        })
    }

    async fn put(&self, key: CacheKey, value: TextClassification) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.capacity {
            // Evict an arbitrary expired-or-oldest entry; a full LRU is more
            // machinery than this cache's hit pattern (short TTL, small N) needs.
            if let Some(stale_key) = entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&stale_key);
            }
        }
        entries.insert(key, Entry { value, created_at: Utc::now() });
    }

    async fn key_lock(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(key.clone()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Returns the cached value, or runs `fetch` exactly once per key among
    /// concurrent callers and caches its result.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<TextClassification, crate::Error>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<TextClassification, crate::Error>>,
    {
        if let Some(cached) = self.get(&key).await {
            return Ok(cached);
        }

        let lock = self.key_lock(&key).await;
        let _guard = lock.lock().await;

        // Another caller may have populated the cache while we waited.
        if let Some(cached) = self.get(&key).await {
            return Ok(cached);
        }

        let value = fetch().await?;
        self.put(key, value).await;
        Ok(value)
    }
}
