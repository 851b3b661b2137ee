//! In-session lookup memo
//!
//! The page re-requests species details on unrelated UI interactions, so
//! identical in-session lookups are answered from this memo instead of
//! re-querying upstream. It is an explicit key→value store owned by the
//! application state, with no eviction; entries live for the process.
//!
//! The lock is not held across the producer await, so two concurrent misses
//! for the same key may both run the producer; the later write wins. That is
//! acceptable for an idempotent lookup cache.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session-scoped memo mapping lookup keys to computed values
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Default for Memo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Look up a memoized value
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Return the memoized value, or run the producer and memoize its result
    ///
    /// The producer runs only on a miss; its error is returned to the caller
    /// and nothing is memoized, so a failed lookup is retried on the next
    /// request for the same key.
    pub async fn try_get_or_insert_with<F, Fut, E>(&self, key: K, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let value = producer().await?;
        self.entries.write().await.insert(key, value.clone());
        Ok(value)
    }

    /// Number of memoized entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
