use super::{from_millis, parse_json, parse_text, read_error, to_millis, write_error, SqliteStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{Grant, InitialTokenDistribution};
use crate::repositories::traits::{GrantRepository, TokenDistributionRepository};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn grant_from_row(row: &Row<'_>) -> rusqlite::Result<Grant> {
    Ok(Grant {
        id: row.get(0)?,
        title: row.get(1)?,
        metadata: parse_json(2, row.get(2)?)?,
        modified_on: from_millis(3, row.get(3)?)?,
    })
}

fn distribution_from_row(row: &Row<'_>) -> rusqlite::Result<InitialTokenDistribution> {
    Ok(InitialTokenDistribution {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        claim_total: parse_text::<Decimal>(2, row.get(2)?)?,
        created_on: from_millis(3, row.get(3)?)?,
    })
}

fn load_grant(conn: &Connection, id: i64) -> StoreResult<Grant> {
    conn.query_row(
        "SELECT id, title, metadata, modified_on FROM grants WHERE id = ?1",
        params![id],
        grant_from_row,
    )
    .optional()
    .map_err(read_error)?
    .ok_or_else(|| StoreError::NotFound(format!("grant {}", id)))
}

fn encode_metadata(grant: &Grant) -> StoreResult<String> {
    serde_json::to_string(&grant.metadata)
        .map_err(|e| StoreError::Invalid(format!("grant metadata: {}", e)))
}

#[async_trait]
impl GrantRepository for SqliteStore {
    async fn create_grant(&self, grant: &Grant) -> StoreResult<Grant> {
        let metadata = encode_metadata(grant)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO grants (id, title, metadata, modified_on) VALUES (?1, ?2, ?3, ?4)",
            params![grant.id, grant.title, metadata, to_millis(grant.modified_on)],
        )
        .map_err(|e| write_error(e, "grants.id"))?;
        load_grant(&conn, grant.id)
    }

    async fn get_grant(&self, id: i64) -> StoreResult<Grant> {
        let conn = self.conn()?;
        load_grant(&conn, id)
    }

    async fn save_grant(&self, grant: &Grant) -> StoreResult<Grant> {
        let metadata = encode_metadata(grant)?;
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE grants SET title = ?2, metadata = ?3, modified_on = ?4 WHERE id = ?1",
            params![grant.id, grant.title, metadata, to_millis(Utc::now())],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("grant {}", grant.id)));
        }
        load_grant(&conn, grant.id)
    }
}

#[async_trait]
impl TokenDistributionRepository for SqliteStore {
    async fn delete_all_distributions(&self) -> StoreResult<usize> {
        let conn = self.conn()?;
        Ok(conn.execute("DELETE FROM initial_token_distributions", [])?)
    }

    async fn create_distribution(
        &self,
        profile_id: i64,
        claim_total: Decimal,
    ) -> StoreResult<InitialTokenDistribution> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO initial_token_distributions (profile_id, claim_total, created_on)
             VALUES (?1, ?2, ?3)",
            params![profile_id, claim_total.to_string(), to_millis(Utc::now())],
        )
        .map_err(|e| write_error(e, "initial_token_distributions"))?;

        conn.query_row(
            "SELECT id, profile_id, claim_total, created_on
             FROM initial_token_distributions WHERE id = ?1",
            params![conn.last_insert_rowid()],
            distribution_from_row,
        )
        .map_err(read_error)
    }

    async fn list_distributions(&self) -> StoreResult<Vec<InitialTokenDistribution>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, profile_id, claim_total, created_on
             FROM initial_token_distributions ORDER BY id",
        )?;
        let rows = stmt.query_map([], distribution_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::traits::AccountRepository;
    use std::str::FromStr;

    fn grant(id: i64) -> Grant {
        Grant {
            id,
            title: "Gas Tools".to_string(),
            metadata: serde_json::Map::new(),
            modified_on: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_grant_metadata() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut saved = store.create_grant(&grant(12)).await.unwrap();

        saved.set_conviction(3.25);
        store.save_grant(&saved).await.unwrap();

        let loaded = store.get_grant(12).await.unwrap();
        assert_eq!(loaded.conviction(), Some(3.25));
    }

    #[tokio::test]
    async fn test_save_missing_grant() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.save_grant(&grant(7)).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_claim_total_keeps_precision() {
        let store = SqliteStore::open_in_memory().unwrap();
        let profile = store.create_profile("owocki", None).await.unwrap();
        let claim = Decimal::from_str("12345000000000000000").unwrap();

        store.create_distribution(profile.id, claim).await.unwrap();

        let rows = store.list_distributions().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].claim_total, claim);

        assert_eq!(store.delete_all_distributions().await.unwrap(), 1);
        assert!(store.list_distributions().await.unwrap().is_empty());
    }
}
