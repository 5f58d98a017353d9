//! Gitcoin MCP Server - gas dashboard, town square and import jobs.
//!
//! This library exposes the Gitcoin gas tools (live prices, history,
//! calculator) and the town square (offers, announcements, comments, trust
//! bonus) as Model Context Protocol tools, and carries the one-off import
//! jobs for the initial token distribution and conviction-voting totals.
//!
//! # Architecture
//!
//! - **models**: Records for gas data, accounts, town square, grants and claims
//! - **domain**: Validated value objects (breakdown, grant id, network, slugs)
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP clients for the gas data API and the subgraph
//! - **cache**: TTL cache store and the cache-aside gas history accessor
//! - **repositories**: Persistence traits and their SQLite implementation
//! - **views**: View handlers producing typed template contexts
//! - **imports**: CSV and subgraph import jobs with per-row reports
//! - **server**: MCP protocol server

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod imports;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod server;
pub mod views;

pub use cache::{HistoryCache, TimedCache};
pub use client::{AsyncGasClientImpl, GasApiClient, SubgraphClient};
pub use config::Config;
pub use error::{ConfigError, ImportError, ProviderError, StoreError, ViewError};
pub use imports::{ImportReport, ResetMode, RowOutcome};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use repositories::SqliteStore;
pub use server::GitcoinMcpServer;
pub use views::{GasViews, TownSquareViews};
