//! Gitcoin MCP Server - Main entry point
//!
//! Serves the gas dashboard and town square tools over stdio.

use anyhow::Result;
use gitcoin_mcp_server::cache::CacheStore;
use gitcoin_mcp_server::client::{ConversionProvider, GasDataProvider};
use gitcoin_mcp_server::models::HistorySeries;
use gitcoin_mcp_server::repositories::TownSquareStore;
use gitcoin_mcp_server::{
    logging, AsyncGasClientImpl, Config, GasApiClient, GasViews, GitcoinMcpServer, HistoryCache,
    Metrics, SqliteStore, TimedCache, TownSquareViews,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    // Logging goes to stderr; stdout carries the MCP protocol
    logging::init(&logging::level_from_env());

    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let metrics = Metrics::new();

    let gas_client = GasApiClient::new(&config)?.with_metrics(metrics.clone());
    info!("Starting Gitcoin MCP Server with gas API: {}", config.gas_api_url()?);

    let provider = AsyncGasClientImpl::new(gas_client);
    let gas = Arc::new(provider.clone()) as Arc<dyn GasDataProvider>;
    let fx = Arc::new(provider) as Arc<dyn ConversionProvider>;

    let ttl = Duration::from_secs(config.history_cache_ttl_secs());
    let cache_store = Arc::new(TimedCache::<String, HistorySeries>::new())
        as Arc<dyn CacheStore<HistorySeries>>;
    let history = HistoryCache::new(gas.clone(), cache_store, config.debug)
        .with_ttl(ttl)
        .with_metrics(metrics.clone());

    let store = Arc::new(SqliteStore::open(&config.database_path)?) as Arc<dyn TownSquareStore>;
    info!("Database opened at {}", config.database_path);

    let gas_views = GasViews::new(gas, fx, history)
        .with_confirm_time_target(config.confirm_time_minutes_target);
    let townsquare = TownSquareViews::new(store, config.network());

    let server = GitcoinMcpServer::new(gas_views, townsquare);

    info!(
        "History cache TTL: {} minutes, debug: {}",
        config.history_cache_ttl_minutes, config.debug
    );

    info!("Starting MCP server with stdio transport");
    gitcoin_mcp_server::server::run_server(server).await?;

    let summary = metrics.summary();
    info!(
        "Gitcoin MCP Server shutdown complete ({} provider requests, {} errors, {} cache hits)",
        summary.http_requests_total, summary.http_errors_total, summary.cache_hits_total
    );
    Ok(())
}
