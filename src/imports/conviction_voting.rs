//! Conviction-voting grant import.
//!
//! Pulls grant votes from the conviction-voting subgraph and stores each
//! grant's total vote amount (in whole tokens) under `metadata.cv`.

use super::report::{ImportReport, RowOutcome};
use crate::client::SubgraphClient;
use crate::domain::{GrantId, ValidationError};
use crate::error::{ImportResult, ProviderError, ProviderResult, StoreError};
use crate::metrics::Metrics;
use crate::repositories::GrantRepository;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Grants with their votes and releases, first page ordered by id.
pub const GRANTS_QUERY: &str = r#"
query getGrants {
  grants(orderBy: id, orderDirection: asc, first: 100) {
    id
    votes {
      id
      amount
      createdAt
    }
    releases {
      id
      amount
      createdAt
    }
  }
}
"#;

const WEI_PER_TOKEN: f64 = 1e18;

#[derive(Debug, Deserialize)]
pub struct GrantsData {
    pub grants: Vec<SubgraphGrant>,
}

/// A grant as the subgraph reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubgraphGrant {
    /// Hexadecimal entity id
    pub id: String,
    #[serde(default)]
    pub votes: Vec<SubgraphTransfer>,
    #[serde(default)]
    pub releases: Vec<SubgraphTransfer>,
}

/// A vote or release. Amounts are integer wei.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubgraphTransfer {
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<serde_json::Value>,
}

/// BigInt fields arrive as strings, but tolerate plain numbers too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected amount, got {}",
            other
        ))),
    }
}

/// One report row per subgraph grant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvictionRow {
    pub subgraph_id: String,
    pub grant_id: Option<i64>,
    pub amount: Option<f64>,
}

#[derive(Debug, Error)]
enum GrantError {
    #[error(transparent)]
    InvalidId(#[from] ValidationError),

    #[error("invalid vote amount {0:?}")]
    InvalidAmount(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sum of vote amounts, converted from wei to tokens.
fn vote_total(grant: &SubgraphGrant) -> Result<f64, GrantError> {
    let mut total: u128 = 0;
    for vote in &grant.votes {
        let amount: u128 = vote
            .amount
            .trim()
            .parse()
            .map_err(|_| GrantError::InvalidAmount(vote.amount.clone()))?;
        total = total
            .checked_add(amount)
            .ok_or_else(|| GrantError::InvalidAmount(vote.amount.clone()))?;
    }
    Ok(total as f64 / WEI_PER_TOKEN)
}

/// Run [`GRANTS_QUERY`] against the subgraph.
pub fn fetch_grants(client: &SubgraphClient) -> ProviderResult<Vec<SubgraphGrant>> {
    let data: GrantsData = client.run_query(GRANTS_QUERY)?;
    tracing::info!("Fetched {} grants from {}", data.grants.len(), client.url());
    Ok(data.grants)
}

async fn apply_one(
    grant: &SubgraphGrant,
    repo: &dyn GrantRepository,
    row: &mut ConvictionRow,
) -> Result<(), GrantError> {
    let id = GrantId::from_hex(&grant.id)?;
    row.grant_id = Some(id.value());

    let amount = vote_total(grant)?;
    row.amount = Some(amount);
    tracing::debug!(
        "grant {} cv={} ({} releases ignored)",
        id,
        amount,
        grant.releases.len()
    );

    let mut stored = repo.get_grant(id.value()).await?;
    stored.set_conviction(amount);
    repo.save_grant(&stored).await?;

    Ok(())
}

/// Write each grant's conviction total. Failures are recorded per grant.
pub async fn apply_conviction(
    grants: &[SubgraphGrant],
    repo: &dyn GrantRepository,
    metrics: &Metrics,
) -> ImportReport<ConvictionRow> {
    let mut report = ImportReport::new();

    for grant in grants {
        let mut row = ConvictionRow {
            subgraph_id: grant.id.clone(),
            grant_id: None,
            amount: None,
        };

        match apply_one(grant, repo, &mut row).await {
            Ok(()) => {
                metrics.record_row_imported();
                report.record(row, RowOutcome::Imported);
            }
            Err(err) => {
                tracing::warn!("Grant {} was not updated. Error: {}", grant.id, err);
                metrics.record_row_failed();
                report.record(row, RowOutcome::failed(err));
            }
        }
    }

    report
}

/// Fetch from the subgraph and apply. A failed query aborts the run.
pub async fn run(
    client: SubgraphClient,
    repo: &dyn GrantRepository,
    metrics: &Metrics,
) -> ImportResult<ImportReport<ConvictionRow>> {
    let grants = tokio::task::spawn_blocking(move || fetch_grants(&client))
        .await
        .map_err(|e| ProviderError::HttpError(format!("Task join error: {}", e)))??;

    Ok(apply_conviction(&grants, repo, metrics).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(id: &str, amounts: &[&str]) -> SubgraphGrant {
        SubgraphGrant {
            id: id.to_string(),
            votes: amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| SubgraphTransfer {
                    id: format!("vote-{}", i),
                    amount: amount.to_string(),
                    created_at: None,
                })
                .collect(),
            releases: Vec::new(),
        }
    }

    #[test]
    fn test_vote_total_in_tokens() {
        let g = grant("0x1", &["1000000000000000000", "500000000000000000"]);
        assert_eq!(vote_total(&g).unwrap(), 1.5);
    }

    #[test]
    fn test_vote_total_without_votes() {
        assert_eq!(vote_total(&grant("0x1", &[])).unwrap(), 0.0);
    }

    #[test]
    fn test_vote_total_rejects_garbage() {
        assert!(vote_total(&grant("0x1", &["lots"])).is_err());
    }

    #[test]
    fn test_decode_grants_payload() {
        let payload = r#"{
            "grants": [
                {"id": "0x0a", "votes": [{"id": "v1", "amount": "2000000000000000000", "createdAt": "1653500000"}], "releases": []},
                {"id": "0x0b", "votes": [{"id": "v2", "amount": 3, "createdAt": 1653500000}]}
            ]
        }"#;
        let data: GrantsData = serde_json::from_str(payload).unwrap();

        assert_eq!(data.grants.len(), 2);
        assert_eq!(data.grants[1].votes[0].amount, "3");
        assert!(data.grants[1].releases.is_empty());
    }
}
