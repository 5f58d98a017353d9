use super::{from_millis, parse_json, parse_text, read_error, to_millis, write_error, SqliteStore};
use crate::domain::Network;
use crate::error::{StoreError, StoreResult};
use crate::models::{Activity, Comment, Flag, Like, Profile, Tip, User};
use crate::repositories::traits::{AccountRepository, ActivityRepository, TipRepository};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROFILE_COLUMNS: &str = "id, handle, user_id, created_on";
const ACTIVITY_COLUMNS: &str = "id, profile_id, url, metadata, created_on";
const COMMENT_COLUMNS: &str = "id, profile_id, activity_id, comment, created_on, modified_on";

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        handle: row.get(1)?,
        user_id: row.get(2)?,
        created_on: from_millis(3, row.get(3)?)?,
    })
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        url: row.get(2)?,
        metadata: parse_json(3, row.get(3)?)?,
        created_on: from_millis(4, row.get(4)?)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        activity_id: row.get(2)?,
        comment: row.get(3)?,
        created_on: from_millis(4, row.get(4)?)?,
        modified_on: from_millis(5, row.get(5)?)?,
    })
}

fn tip_from_row(row: &Row<'_>) -> rusqlite::Result<Tip> {
    Ok(Tip {
        id: row.get(0)?,
        comments_priv: row.get(1)?,
        network: parse_text::<Network>(2, row.get(2)?)?,
        value_in_eth: row.get(3)?,
        created_on: from_millis(4, row.get(4)?)?,
    })
}

fn load_profile(conn: &Connection, id: i64) -> StoreResult<Profile> {
    conn.query_row(
        &format!("SELECT {} FROM profiles WHERE id = ?1", PROFILE_COLUMNS),
        params![id],
        profile_from_row,
    )
    .optional()
    .map_err(read_error)?
    .ok_or_else(|| StoreError::NotFound(format!("profile {}", id)))
}

fn load_activity(conn: &Connection, id: i64) -> StoreResult<Activity> {
    conn.query_row(
        &format!("SELECT {} FROM activities WHERE id = ?1", ACTIVITY_COLUMNS),
        params![id],
        activity_from_row,
    )
    .optional()
    .map_err(read_error)?
    .ok_or_else(|| StoreError::NotFound(format!("activity {}", id)))
}

/// Likes and flags share a shape; `table` is one of the two.
fn insert_reaction(
    conn: &Connection,
    table: &str,
    profile_id: i64,
    activity_id: i64,
) -> StoreResult<(i64, chrono::DateTime<Utc>)> {
    let created_on = from_millis(0, to_millis(Utc::now()))?;
    conn.execute(
        &format!(
            "INSERT INTO {} (profile_id, activity_id, created_on) VALUES (?1, ?2, ?3)",
            table
        ),
        params![profile_id, activity_id, to_millis(created_on)],
    )
    .map_err(|e| write_error(e, table))?;
    Ok((conn.last_insert_rowid(), created_on))
}

fn list_reactions(
    conn: &Connection,
    table: &str,
    activity_id: i64,
) -> StoreResult<Vec<(i64, i64, i64, chrono::DateTime<Utc>)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, profile_id, activity_id, created_on FROM {} WHERE activity_id = ?1 ORDER BY id",
        table
    ))?;
    let rows = stmt.query_map(params![activity_id], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            from_millis(3, row.get(3)?)?,
        ))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
}

#[async_trait]
impl AccountRepository for SqliteStore {
    async fn create_user(&self, username: &str) -> StoreResult<User> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO users (username) VALUES (?1)", params![username])
            .map_err(|e| write_error(e, "users.username"))?;
        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
        })
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn create_profile(&self, handle: &str, user_id: Option<i64>) -> StoreResult<Profile> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO profiles (handle, user_id, created_on) VALUES (?1, ?2, ?3)",
            params![handle, user_id, to_millis(Utc::now())],
        )
        .map_err(|e| write_error(e, "profiles.handle"))?;
        load_profile(&conn, conn.last_insert_rowid())
    }

    async fn get_profile(&self, id: i64) -> StoreResult<Profile> {
        let conn = self.conn()?;
        load_profile(&conn, id)
    }

    async fn get_profile_by_handle(&self, handle: &str) -> StoreResult<Profile> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM profiles WHERE handle = ?1", PROFILE_COLUMNS),
            params![handle],
            profile_from_row,
        )
        .optional()
        .map_err(read_error)?
        .ok_or_else(|| StoreError::NotFound(format!("profile with handle {}", handle)))
    }
}

#[async_trait]
impl ActivityRepository for SqliteStore {
    async fn create_activity(
        &self,
        profile_id: i64,
        url: &str,
        metadata: serde_json::Value,
    ) -> StoreResult<Activity> {
        let conn = self.conn()?;
        let metadata = serde_json::to_string(&metadata)
            .map_err(|e| StoreError::Invalid(format!("activity metadata: {}", e)))?;
        conn.execute(
            "INSERT INTO activities (profile_id, url, metadata, created_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![profile_id, url, metadata, to_millis(Utc::now())],
        )
        .map_err(|e| write_error(e, "activities"))?;
        load_activity(&conn, conn.last_insert_rowid())
    }

    async fn get_activity(&self, id: i64) -> StoreResult<Activity> {
        let conn = self.conn()?;
        load_activity(&conn, id)
    }

    async fn create_like(&self, profile_id: i64, activity_id: i64) -> StoreResult<Like> {
        let conn = self.conn()?;
        let (id, created_on) = insert_reaction(&conn, "likes", profile_id, activity_id)?;
        Ok(Like {
            id,
            profile_id,
            activity_id,
            created_on,
        })
    }

    async fn likes_for_activity(&self, activity_id: i64) -> StoreResult<Vec<Like>> {
        let conn = self.conn()?;
        Ok(list_reactions(&conn, "likes", activity_id)?
            .into_iter()
            .map(|(id, profile_id, activity_id, created_on)| Like {
                id,
                profile_id,
                activity_id,
                created_on,
            })
            .collect())
    }

    async fn create_flag(&self, profile_id: i64, activity_id: i64) -> StoreResult<Flag> {
        let conn = self.conn()?;
        let (id, created_on) = insert_reaction(&conn, "flags", profile_id, activity_id)?;
        Ok(Flag {
            id,
            profile_id,
            activity_id,
            created_on,
        })
    }

    async fn flags_for_activity(&self, activity_id: i64) -> StoreResult<Vec<Flag>> {
        let conn = self.conn()?;
        Ok(list_reactions(&conn, "flags", activity_id)?
            .into_iter()
            .map(|(id, profile_id, activity_id, created_on)| Flag {
                id,
                profile_id,
                activity_id,
                created_on,
            })
            .collect())
    }

    async fn create_comment(
        &self,
        profile_id: i64,
        activity_id: i64,
        comment: &str,
    ) -> StoreResult<Comment> {
        let conn = self.conn()?;
        let now = to_millis(Utc::now());
        conn.execute(
            "INSERT INTO comments (profile_id, activity_id, comment, created_on, modified_on)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![profile_id, activity_id, comment, now],
        )
        .map_err(|e| write_error(e, "comments"))?;

        conn.query_row(
            &format!("SELECT {} FROM comments WHERE id = ?1", COMMENT_COLUMNS),
            params![conn.last_insert_rowid()],
            comment_from_row,
        )
        .map_err(read_error)
    }

    async fn comments_for_activity(&self, activity_id: i64) -> StoreResult<Vec<Comment>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM comments WHERE activity_id = ?1 ORDER BY created_on, id",
            COMMENT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![activity_id], comment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
    }
}

#[async_trait]
impl TipRepository for SqliteStore {
    async fn create_tip(
        &self,
        comments_priv: &str,
        network: Network,
        value_in_eth: f64,
    ) -> StoreResult<Tip> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tips (comments_priv, network, value_in_eth, created_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                comments_priv,
                network.as_str(),
                value_in_eth,
                to_millis(Utc::now())
            ],
        )
        .map_err(|e| write_error(e, "tips"))?;

        conn.query_row(
            "SELECT id, comments_priv, network, value_in_eth, created_on FROM tips WHERE id = ?1",
            params![conn.last_insert_rowid()],
            tip_from_row,
        )
        .map_err(read_error)
    }

    async fn tips_for(&self, comments_priv: &str, network: Network) -> StoreResult<Vec<Tip>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, comments_priv, network, value_in_eth, created_on
             FROM tips WHERE comments_priv = ?1 AND network = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![comments_priv, network.as_str()], tip_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
    }
}
