//! In-memory TTL cache implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use keystone_core::clock::{Clock, SystemClock};
use keystone_core::ports::Cache;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Same as `stored_at + ttl <= now`, without overflowing for huge TTLs.
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) >= self.ttl
    }
}

/// In-memory cache using a HashMap behind a mutex.
///
/// Entries expire lazily: a read that finds a dead entry removes it.
/// There is no capacity bound, so memory grows with the number of distinct
/// keys unless [`Cache::purge_expired`] is called periodically.
/// Note: Data is lost on process restart.
pub struct InMemoryCache<V> {
    store: Mutex<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V> InMemoryCache<V> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl<V> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> for InMemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut store = self.store.lock();

        match store.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => {}
        }

        store.remove(key);
        tracing::trace!(cache_key = %key, "Evicted expired entry");
        None
    }

    fn put(&self, key: &str, value: V, ttl: Duration) {
        let now = self.clock.now();
        let mut store = self.store.lock();

        store.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.store.lock().remove(key).map(|entry| entry.value)
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut store = self.store.lock();
        let before = store.len();
        store.retain(|_, entry| !entry.is_expired(now));
        before - store.len()
    }

    fn len(&self) -> usize {
        self.store.lock().len()
    }
}
