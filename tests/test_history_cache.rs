//! Tests for the cache-aside gas history accessor.

mod mocks;

use gitcoin_mcp_server::cache::{history_cache_key, CacheStore, HistoryCache, TimedCache};
use gitcoin_mcp_server::client::GasDataProvider;
use gitcoin_mcp_server::domain::Breakdown;
use gitcoin_mcp_server::error::ProviderError;
use gitcoin_mcp_server::models::HistorySeries;
use gitcoin_mcp_server::Metrics;
use mocks::MockGasProvider;
use std::sync::Arc;
use std::time::Duration;

fn setup(debug: bool) -> (MockGasProvider, Arc<dyn CacheStore<HistorySeries>>, HistoryCache) {
    let provider = MockGasProvider::new();
    provider.set_history(
        Breakdown::Hourly,
        60,
        vec![
            MockGasProvider::point(14.0, 1),
            MockGasProvider::point(22.0, 2),
        ],
    );

    let store = Arc::new(TimedCache::<String, HistorySeries>::new())
        as Arc<dyn CacheStore<HistorySeries>>;
    let cache = HistoryCache::new(
        Arc::new(provider.clone()) as Arc<dyn GasDataProvider>,
        store.clone(),
        debug,
    );

    (provider, store, cache)
}

#[tokio::test]
async fn test_second_call_is_served_from_cache() {
    let (provider, _store, cache) = setup(false);

    let first = cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();
    let second = cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();

    assert_eq!(provider.get_call_count("gas_history"), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn test_series_stored_under_history_key() {
    let (_provider, store, cache) = setup(false);

    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();

    let stored = store.get("get_history_cached_hourly_60_0").unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(
        history_cache_key(Breakdown::Hourly, 60),
        "get_history_cached_hourly_60_0"
    );
}

#[tokio::test]
async fn test_keys_are_per_breakdown_and_granularity() {
    let (provider, _store, cache) = setup(false);

    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();
    cache.get_history_cached(Breakdown::Daily, 60).await.unwrap();
    cache.get_history_cached(Breakdown::Hourly, 5).await.unwrap();

    assert_eq!(provider.get_call_count("gas_history"), 3);
}

#[tokio::test]
async fn test_debug_mode_always_calls_provider() {
    let (provider, store, cache) = setup(true);

    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();
    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();

    assert_eq!(provider.get_call_count("gas_history"), 2);
    // Results are still written back.
    assert!(store.get(&history_cache_key(Breakdown::Hourly, 60)).is_some());
}

#[tokio::test]
async fn test_cached_empty_series_is_a_miss() {
    let (provider, store, cache) = setup(false);

    store.set(
        history_cache_key(Breakdown::Weekly, 1),
        Arc::new(Vec::new()),
        Duration::from_secs(60),
    );

    let series = cache.get_history_cached(Breakdown::Weekly, 1).await.unwrap();
    assert!(series.is_empty());
    assert_eq!(provider.get_call_count("gas_history"), 1);

    cache.get_history_cached(Breakdown::Weekly, 1).await.unwrap();
    assert_eq!(provider.get_call_count("gas_history"), 2);
}

#[tokio::test]
async fn test_provider_error_is_propagated_and_not_cached() {
    let (provider, store, cache) = setup(false);
    provider.set_failing(true);

    let result = cache.get_history_cached(Breakdown::Hourly, 60).await;
    assert!(matches!(result, Err(ProviderError::Timeout)));
    assert!(store.get(&history_cache_key(Breakdown::Hourly, 60)).is_none());

    provider.set_failing(false);
    let series = cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();
    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let (provider, _store, cache) = setup(false);
    let cache = cache.with_ttl(Duration::from_millis(20));

    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();

    assert_eq!(provider.get_call_count("gas_history"), 2);
}

#[tokio::test]
async fn test_hits_and_misses_are_counted() {
    let (_provider, _store, cache) = setup(false);
    let metrics = Metrics::new();
    let cache = cache.with_metrics(metrics.clone());

    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();
    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();
    cache.get_history_cached(Breakdown::Hourly, 60).await.unwrap();

    assert_eq!(metrics.cache_misses_total(), 1);
    assert_eq!(metrics.cache_hits_total(), 2);
}

#[tokio::test]
async fn test_concurrent_misses_both_reach_provider() {
    let (provider, store, cache) = setup(false);
    provider.set_history_delay(Duration::from_millis(50));

    let (first, second) = tokio::join!(
        cache.get_history_cached(Breakdown::Hourly, 60),
        cache.get_history_cached(Breakdown::Hourly, 60),
    );

    // Nothing coordinates a miss with its write, so both callers fetch.
    assert_eq!(provider.get_call_count("gas_history"), 2);
    assert_eq!(first.unwrap().len(), 2);
    assert_eq!(second.unwrap().len(), 2);
    assert!(store.get(&history_cache_key(Breakdown::Hourly, 60)).is_some());
}
