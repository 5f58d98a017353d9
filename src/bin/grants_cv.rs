//! Store conviction-voting totals on grants.
//!
//! Queries the conviction-voting subgraph and writes each grant's summed
//! vote amount to `metadata.cv`.

use anyhow::{Context, Result};
use clap::Parser;
use gitcoin_mcp_server::imports::conviction_voting;
use gitcoin_mcp_server::{logging, Config, Metrics, SqliteStore, SubgraphClient};
use std::path::PathBuf;

/// Pull conviction-voting totals into grant metadata.
///
/// CLI arguments take precedence over environment variables.
#[derive(Parser, Debug)]
#[command(name = "grants_cv", version, about)]
struct Cli {
    /// GraphQL endpoint [env: SUBGRAPH_URL]
    #[arg(long, short = 'u')]
    subgraph_url: Option<String>,

    /// SQLite database file [env: DATABASE_PATH] [default: gitcoin.db]
    #[arg(long, short = 'd')]
    database: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    logging::init(&config.log_level);

    let url = match cli.subgraph_url {
        Some(url) => url,
        None => config.subgraph_endpoint()?.to_string(),
    };
    let database = cli
        .database
        .unwrap_or_else(|| PathBuf::from(&config.database_path));
    let store = SqliteStore::open(&database)
        .with_context(|| format!("opening {}", database.display()))?;

    let metrics = Metrics::new();
    let client = SubgraphClient::new(url, config.request_timeout).with_metrics(metrics.clone());
    let report = conviction_voting::run(client, &store, &metrics).await?;

    println!("Grant Results");
    println!("#############");
    for (row, outcome) in report.outcomes() {
        match (row.grant_id, row.amount) {
            (Some(id), Some(amount)) if outcome.is_imported() => println!("{} {}", id, amount),
            _ => println!("{} skipped: {:?}", row.subgraph_id, outcome),
        }
    }

    Ok(())
}
