//! Initial token distribution import.
//!
//! Reads a CSV of `handle,value_created_usd` rows and writes one
//! [`InitialTokenDistribution`](crate::models::InitialTokenDistribution) per
//! row, with the USD value scaled to wei.
//!
//! In the default [`ResetMode::EachRow`] the whole table is cleared before
//! every row, so a run leaves behind at most the last successful row. Use
//! [`ResetMode::BeforeImport`] to clear once and keep every row.

use super::report::{ImportReport, RowOutcome};
use crate::error::{ImportError, ImportResult, StoreError};
use crate::metrics::Metrics;
use crate::repositories::{AccountRepository, DistributionStore, TokenDistributionRepository};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

pub const HANDLE_COLUMN: &str = "handle";
pub const VALUE_COLUMN: &str = "value_created_usd";

/// File read when no path is given.
pub const DEFAULT_CSV_PATH: &str = "test_initial_dist.csv";

/// Wei per whole token.
const WEI_PER_TOKEN: u64 = 1_000_000_000_000_000_000;

/// When existing claims are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResetMode {
    /// Clear the table before every row
    #[default]
    EachRow,
    /// Clear the table once, before the first row
    BeforeImport,
}

/// One input row as read from the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionRow {
    /// 1-based record number, header excluded
    pub record: usize,
    pub handle: String,
    pub value_created_usd: String,
}

#[derive(Debug, Error)]
enum RowError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid value_created_usd {0:?}")]
    InvalidAmount(String),
}

/// Parse a USD value and scale it to wei.
///
/// `Decimal` holds 28 significant digits, so values above roughly 7.9e10 USD
/// overflow and return `None`.
pub fn usd_to_wei(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    value
        .checked_mul(Decimal::from(WEI_PER_TOKEN))
        .map(|wei| wei.normalize())
}

/// Read every row of `input`.
///
/// Fails as a whole only if the CSV cannot be read or a required column is
/// missing from the header. Short rows are kept with empty fields and fail
/// individually later.
pub fn read_rows<R: Read>(input: R) -> ImportResult<Vec<DistributionRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
    };
    let handle_idx = column(HANDLE_COLUMN)?;
    let value_idx = column(VALUE_COLUMN)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(DistributionRow {
            record: i + 1,
            handle: record.get(handle_idx).unwrap_or_default().to_string(),
            value_created_usd: record.get(value_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(rows)
}

async fn import_row(
    store: &dyn DistributionStore,
    row: &DistributionRow,
    mode: ResetMode,
) -> Result<(), RowError> {
    if mode == ResetMode::EachRow {
        store.delete_all_distributions().await?;
    }

    let profile = store.get_profile_by_handle(&row.handle).await?;
    let claim_total = usd_to_wei(&row.value_created_usd)
        .ok_or_else(|| RowError::InvalidAmount(row.value_created_usd.clone()))?;
    store.create_distribution(profile.id, claim_total).await?;

    Ok(())
}

/// Import already-parsed rows.
pub async fn import_rows(
    rows: Vec<DistributionRow>,
    store: &dyn DistributionStore,
    mode: ResetMode,
    metrics: &Metrics,
) -> ImportResult<ImportReport<DistributionRow>> {
    if mode == ResetMode::BeforeImport {
        let removed = store.delete_all_distributions().await?;
        tracing::info!("Cleared {} existing distributions", removed);
    }

    let mut report = ImportReport::new();
    for row in rows {
        match import_row(store, &row, mode).await {
            Ok(()) => {
                metrics.record_row_imported();
                report.record(row, RowOutcome::Imported);
            }
            Err(err) => {
                tracing::warn!("User: {} was not added. Error: {}", row.handle, err);
                metrics.record_row_failed();
                report.record(row, RowOutcome::failed(err));
            }
        }
    }

    tracing::info!(
        "Token distribution import finished: {} imported, {} failed",
        report.succeeded(),
        report.failed()
    );

    Ok(report)
}

/// Read `input` as CSV and import every row.
pub async fn import_distributions<R: Read>(
    input: R,
    store: &dyn DistributionStore,
    mode: ResetMode,
    metrics: &Metrics,
) -> ImportResult<ImportReport<DistributionRow>> {
    let rows = read_rows(input)?;
    import_rows(rows, store, mode, metrics).await
}
