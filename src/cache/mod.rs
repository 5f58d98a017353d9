//! Caching utilities.
//!
//! `TimedCache` is the injected key-value store with per-entry expiry;
//! `HistoryCache` is the cache-aside accessor the gas history view reads
//! through.

pub mod history;
pub mod timed_cache;

pub use history::{history_cache_key, HistoryCache, HISTORY_CACHE_TTL};
pub use timed_cache::{CacheStore, TimedCache};
