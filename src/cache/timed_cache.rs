//! Time-based cache with TTL (Time To Live) support.
//!
//! This module provides a thread-safe cache whose entries expire after a
//! duration chosen on every write.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Key-value store with explicit expiry, injected wherever a view needs one.
///
/// Reads and writes are independent operations; nothing coordinates a
/// read-miss with the write that follows it.
pub trait CacheStore<V>: Send + Sync {
    /// The live value for `key`, if any.
    fn get(&self, key: &str) -> Option<V>;

    /// Store `value` under `key` until `ttl` has elapsed.
    fn set(&self, key: String, value: V, ttl: Duration);
}

/// A cache entry with its expiry deadline.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// A thread-safe cache with time-based expiration.
///
/// The cache can be cloned cheaply; clones share the same entries. Expired
/// entries are ignored on read and replaced by the next write to their key.
///
/// # Memory Efficiency with Arc
///
/// For large values, consider wrapping them in `Arc` to avoid cloning:
/// ```ignore
/// let cache = TimedCache::<String, Arc<Vec<GasHistoryPoint>>>::new();
/// cache.set("key".to_string(), Arc::new(series), Duration::from_secs(60));
/// ```
#[derive(Clone)]
pub struct TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    cache: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
}

impl<K, V> Default for TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a value that expires after `ttl`.
    ///
    /// If a value with the same key already exists, it will be replaced.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, entry);
        }
    }

    /// Get a value from the cache if it exists and hasn't expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();

        if let Ok(cache) = self.cache.read() {
            if let Some(entry) = cache.get(key) {
                if now < entry.expires_at {
                    return Some(entry.value.clone());
                }
            }
        }

        None
    }
}

impl<V> CacheStore<V> for TimedCache<String, V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        TimedCache::get(self, key)
    }

    fn set(&self, key: String, value: V, ttl: Duration) {
        self.insert_with_ttl(key, value, ttl);
    }
}

impl<K, V> std::fmt::Debug for TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn store() -> TimedCache<String, u32> {
        TimedCache::new()
    }

    #[test]
    fn test_set_and_get() {
        let cache = store();
        CacheStore::set(&cache, "answer".to_string(), 42, Duration::from_secs(60));

        assert_eq!(CacheStore::get(&cache, "answer"), Some(42));
        assert_eq!(CacheStore::get(&cache, "question"), None);
    }

    #[test]
    fn test_ttl_expiration() {
        let cache = store();
        CacheStore::set(&cache, "short".to_string(), 1, Duration::from_millis(50));
        CacheStore::set(&cache, "long".to_string(), 2, Duration::from_secs(60));

        assert_eq!(CacheStore::get(&cache, "short"), Some(1));

        thread::sleep(Duration::from_millis(100));

        assert_eq!(CacheStore::get(&cache, "short"), None);
        assert_eq!(CacheStore::get(&cache, "long"), Some(2));
    }

    #[test]
    fn test_set_replaces_expired_entry() {
        let cache = store();
        CacheStore::set(&cache, "key".to_string(), 1, Duration::from_millis(20));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(CacheStore::get(&cache, "key"), None);

        CacheStore::set(&cache, "key".to_string(), 2, Duration::from_secs(60));
        assert_eq!(CacheStore::get(&cache, "key"), Some(2));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let cache = store();
        let dyn_store: &dyn CacheStore<u32> = &cache;

        dyn_store.set("answer".to_string(), 42, Duration::from_secs(60));

        assert_eq!(dyn_store.get("answer"), Some(42));
    }

    #[test]
    fn test_clone_cache() {
        let cache1 = store();
        CacheStore::set(&cache1, "key1".to_string(), 1, Duration::from_secs(60));

        // Clone shares the same underlying cache
        let cache2 = cache1.clone();
        assert_eq!(CacheStore::get(&cache2, "key1"), Some(1));

        CacheStore::set(&cache2, "key2".to_string(), 2, Duration::from_secs(60));
        assert_eq!(CacheStore::get(&cache1, "key2"), Some(2));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = store();
        let cache_clone = cache.clone();
        let ttl = Duration::from_secs(60);

        let handle = thread::spawn(move || {
            for i in 0..100 {
                CacheStore::set(&cache_clone, format!("key{}", i), i, ttl);
            }
        });

        for i in 100..200 {
            CacheStore::set(&cache, format!("key{}", i), i, ttl);
        }

        handle.join().unwrap();

        assert!((0..200).all(|i| CacheStore::get(&cache, &format!("key{}", i)) == Some(i)));
    }
}
