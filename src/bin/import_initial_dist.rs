//! Populate the initial token distribution from a CSV file.
//!
//! Expects `handle` and `value_created_usd` columns. Rows whose handle has no
//! profile, or whose value does not parse, are logged and skipped.

use anyhow::{Context, Result};
use clap::Parser;
use gitcoin_mcp_server::imports::token_distribution::{self, DEFAULT_CSV_PATH};
use gitcoin_mcp_server::{logging, Config, Metrics, ResetMode, SqliteStore};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

/// Import initial token distribution claims.
///
/// CLI arguments take precedence over environment variables.
#[derive(Parser, Debug)]
#[command(name = "import_initial_dist", version, about)]
struct Cli {
    /// CSV file to read
    #[arg(default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// When existing claims are deleted
    #[arg(long, value_enum, default_value_t = ResetMode::EachRow)]
    reset: ResetMode,

    /// SQLite database file [env: DATABASE_PATH] [default: gitcoin.db]
    #[arg(long, short = 'd')]
    database: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    logging::init(&config.log_level);

    let database = cli
        .database
        .unwrap_or_else(|| PathBuf::from(&config.database_path));
    let store = SqliteStore::open(&database)
        .with_context(|| format!("opening {}", database.display()))?;

    let file = File::open(&cli.csv).with_context(|| format!("opening {}", cli.csv.display()))?;

    if cli.reset == ResetMode::EachRow {
        info!("Clearing claims before every row; only the last imported row is kept");
    }

    let metrics = Metrics::new();
    let report =
        token_distribution::import_distributions(file, &store, cli.reset, &metrics).await?;

    for (row, reason) in report.failures() {
        eprintln!("User: {} was not added. Error: {}", row.handle, reason);
    }
    eprintln!(
        "{} rows imported, {} failed",
        report.succeeded(),
        report.failed()
    );

    Ok(())
}
