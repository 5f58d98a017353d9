//! Cache-aside access to gas price history.
//!
//! Recomputing a history line is expensive for the provider, so each
//! `(breakdown, granularity)` series is kept for a fixed window. There is no
//! single-flight guard: concurrent misses on the same key each call the
//! provider and the last write wins.

use crate::cache::CacheStore;
use crate::client::GasDataProvider;
use crate::domain::Breakdown;
use crate::error::ProviderResult;
use crate::metrics::Metrics;
use crate::models::HistorySeries;
use std::sync::Arc;
use std::time::Duration;

/// How long a fetched history series is served from cache.
pub const HISTORY_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 3);

/// Bumping the salt orphans every previously cached series.
pub const HISTORY_KEY_SALT: &str = "0";

/// Cache key for one history series.
pub fn history_cache_key(breakdown: Breakdown, granularity: u32) -> String {
    format!(
        "get_history_cached_{}_{}_{}",
        breakdown, granularity, HISTORY_KEY_SALT
    )
}

/// Read-through accessor in front of [`GasDataProvider::gas_history`].
#[derive(Clone)]
pub struct HistoryCache {
    provider: Arc<dyn GasDataProvider>,
    store: Arc<dyn CacheStore<HistorySeries>>,
    ttl: Duration,
    debug: bool,
    metrics: Metrics,
}

impl HistoryCache {
    /// In debug mode every call goes to the provider.
    pub fn new(
        provider: Arc<dyn GasDataProvider>,
        store: Arc<dyn CacheStore<HistorySeries>>,
        debug: bool,
    ) -> Self {
        Self {
            provider,
            store,
            ttl: HISTORY_CACHE_TTL,
            debug,
            metrics: Metrics::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Return the history series for `(breakdown, granularity)`.
    ///
    /// A cached, non-empty series is returned as-is outside debug mode.
    /// Otherwise the provider is asked, the answer is cached and returned.
    /// Provider errors are propagated untouched and nothing is cached.
    pub async fn get_history_cached(
        &self,
        breakdown: Breakdown,
        granularity: u32,
    ) -> ProviderResult<HistorySeries> {
        let key = history_cache_key(breakdown, granularity);

        if let Some(series) = self.store.get(&key) {
            if !series.is_empty() && !self.debug {
                tracing::debug!("history cache hit: {}", key);
                self.metrics.record_cache_hit();
                return Ok(series);
            }
        }

        tracing::debug!("history cache miss: {}", key);
        self.metrics.record_cache_miss();

        let series: HistorySeries =
            Arc::new(self.provider.gas_history(breakdown, granularity).await?);
        self.store.set(key, series.clone(), self.ttl);

        Ok(series)
    }
}
