//! Initial token distribution CSV import against an in-memory store.

use gitcoin_mcp_server::imports::token_distribution::{import_distributions, usd_to_wei};
use gitcoin_mcp_server::imports::ResetMode;
use gitcoin_mcp_server::repositories::{
    AccountRepository, SqliteStore, TokenDistributionRepository,
};
use gitcoin_mcp_server::{ImportError, Metrics};
use rust_decimal::Decimal;
use std::str::FromStr;

async fn store_with_profiles(handles: &[&str]) -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    for handle in handles {
        store.create_profile(handle, None).await.unwrap();
    }
    store
}

#[tokio::test]
async fn test_each_row_mode_keeps_only_last_row() {
    let store = store_with_profiles(&["owocki", "gitcoinbot", "kevin"]).await;
    let metrics = Metrics::new();
    let csv = "handle,value_created_usd\nowocki,10\ngitcoinbot,2.5\nkevin,0.75\n";

    let report = import_distributions(csv.as_bytes(), &store, ResetMode::EachRow, &metrics)
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.failed(), 0);

    let rows = store.list_distributions().await.unwrap();
    let kevin = store.get_profile_by_handle("kevin").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].profile_id, kevin.id);
    assert_eq!(rows[0].claim_total, Decimal::from_str("750000000000000000").unwrap());
    assert_eq!(metrics.rows_imported_total(), 3);
}

#[tokio::test]
async fn test_failed_last_row_still_clears_table() {
    let store = store_with_profiles(&["owocki"]).await;
    let metrics = Metrics::new();
    let csv = "handle,value_created_usd\nowocki,10\nghost,5\n";

    let report = import_distributions(csv.as_bytes(), &store, ResetMode::EachRow, &metrics)
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert!(store.list_distributions().await.unwrap().is_empty());
    assert_eq!(metrics.rows_failed_total(), 1);
}

#[tokio::test]
async fn test_unknown_handle_is_reported_not_fatal() {
    let store = store_with_profiles(&["owocki"]).await;
    let csv = "handle,value_created_usd\nghost,5\nowocki,1\n";

    let report = import_distributions(csv.as_bytes(), &store, ResetMode::EachRow, &Metrics::new())
        .await
        .unwrap();

    let failures: Vec<_> = report
        .failures()
        .map(|(row, reason)| (row.handle.clone(), reason.to_string()))
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "ghost");
    assert!(failures[0].1.contains("ghost"));

    let rows = store.list_distributions().await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_before_import_mode_keeps_every_row() {
    let store = store_with_profiles(&["owocki", "gitcoinbot"]).await;
    let metrics = Metrics::new();

    let stale = store.get_profile_by_handle("owocki").await.unwrap();
    store.create_distribution(stale.id, Decimal::ONE).await.unwrap();

    let csv = "handle,value_created_usd\nowocki,1\nghost,3\ngitcoinbot,2\n";
    let report = import_distributions(csv.as_bytes(), &store, ResetMode::BeforeImport, &metrics)
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);

    let totals: Vec<_> = store
        .list_distributions()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.claim_total)
        .collect();
    assert_eq!(
        totals,
        vec![usd_to_wei("1").unwrap(), usd_to_wei("2").unwrap()]
    );
}

#[tokio::test]
async fn test_bad_amounts_fail_their_row() {
    let store = store_with_profiles(&["owocki", "gitcoinbot"]).await;
    let csv = "handle,value_created_usd\nowocki,lots\ngitcoinbot\n";

    let report = import_distributions(csv.as_bytes(), &store, ResetMode::BeforeImport, &Metrics::new())
        .await
        .unwrap();

    assert_eq!(report.failed(), 2);
    assert!(store.list_distributions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_column_aborts() {
    let store = store_with_profiles(&["owocki"]).await;
    let csv = "username,value_created_usd\nowocki,1\n";

    let result = import_distributions(csv.as_bytes(), &store, ResetMode::EachRow, &Metrics::new()).await;

    assert!(matches!(result, Err(ImportError::MissingColumn(col)) if col == "handle"));
}

#[tokio::test]
async fn test_empty_file_leaves_table_untouched_in_each_row_mode() {
    let store = store_with_profiles(&["owocki"]).await;
    let owocki = store.get_profile_by_handle("owocki").await.unwrap();
    store.create_distribution(owocki.id, Decimal::ONE).await.unwrap();

    let report = import_distributions(
        "handle,value_created_usd\n".as_bytes(),
        &store,
        ResetMode::EachRow,
        &Metrics::new(),
    )
    .await
    .unwrap();

    assert!(report.is_empty());
    assert_eq!(store.list_distributions().await.unwrap().len(), 1);
}
