use std::time::Duration;

/// Cache trait - abstraction over expiring key/value stores.
///
/// Reads and writes are synchronous; an entry whose TTL has run out is
/// indistinguishable from a missing one.
pub trait Cache<V>: Send + Sync {
    /// Get a live value from the cache. Expired entries are evicted on read.
    fn get(&self, key: &str) -> Option<V>;

    /// Store a value, replacing any existing entry for `key`.
    fn put(&self, key: &str, value: V, ttl: Duration);

    /// Delete a key from the cache.
    fn remove(&self, key: &str) -> Option<V>;

    /// Evict every expired entry. Returns the number of entries removed.
    fn purge_expired(&self) -> usize;

    /// Number of stored entries, including expired ones not yet evicted.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
