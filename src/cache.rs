use std::collections::HashMap;
use std::future::Future;

use opentelemetry::KeyValue;
use tokio::sync::RwLock;

use crate::telemetry::{CACHE_HITS, CACHE_MISSES};

/// A named, unbounded read-through cache.
///
/// Values are computed lazily on the first read of a key and served from
/// memory until that key is invalidated. Entries never expire on their own.
pub struct ReadThroughCache<V> {
    name: &'static str,
    state: RwLock<CacheState<V>>,
}

struct CacheState<V> {
    entries: HashMap<String, V>,
    loads: HashMap<String, PendingLoad>,
}

// Tracks computations in flight for one key. `generation` is bumped when the
// key is invalidated; a load that finishes under a different generation than
// it started with must not be stored.
struct PendingLoad {
    readers: usize,
    generation: u64,
}

impl<V: Clone> ReadThroughCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                loads: HashMap::new(),
            }),
        }
    }

    /// Returns the cached value for `key`, or awaits `compute` and caches its
    /// result. Errors are passed through and leave the cache untouched.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.state.read().await.entries.get(key) {
            return Ok(self.hit(key, value));
        }

        let started_at = {
            let mut state = self.state.write().await;
            if let Some(value) = state.entries.get(key) {
                return Ok(self.hit(key, value));
            }
            let load = state
                .loads
                .entry(key.to_string())
                .or_insert(PendingLoad {
                    readers: 0,
                    generation: 0,
                });
            load.readers += 1;
            load.generation
        };

        CACHE_MISSES.add(1, &[KeyValue::new("cache.name", self.name)]);
        tracing::debug!(cache = self.name, key, "cache miss");

        let result = compute().await;

        let mut state = self.state.write().await;
        let (current, finished) = match state.loads.get_mut(key) {
            Some(load) => {
                load.readers -= 1;
                (load.generation, load.readers == 0)
            }
            None => (started_at, false),
        };
        if finished {
            state.loads.remove(key);
        }

        let value = result?;
        if current == started_at {
            state.entries.insert(key.to_string(), value.clone());
        } else {
            tracing::debug!(cache = self.name, key, "invalidated during load; not caching");
        }

        Ok(value)
    }

    /// Evicts `key`. Loads of `key` already in flight will not be cached;
    /// other keys are unaffected.
    pub async fn invalidate(&self, key: &str) {
        let mut state = self.state.write().await;
        if let Some(load) = state.loads.get_mut(key) {
            load.generation = load.generation.wrapping_add(1);
        }
        if state.entries.remove(key).is_some() {
            tracing::debug!(cache = self.name, key, "cache entry evicted");
        }
    }

    fn hit(&self, key: &str, value: &V) -> V {
        CACHE_HITS.add(1, &[KeyValue::new("cache.name", self.name)]);
        tracing::debug!(cache = self.name, key, "cache hit");
        value.clone()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}
