//! SQLite implementation of the repository traits.
//!
//! One connection is shared behind a mutex; each repository call holds the
//! lock for a single statement batch. Timestamps are stored as unix
//! milliseconds, decimals as text so no precision is lost.

mod accounts;
mod imports;
mod townsquare;

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS profiles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    handle      TEXT NOT NULL UNIQUE,
    user_id     INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_on  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS activities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id  INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    url         TEXT NOT NULL DEFAULT '',
    metadata    TEXT NOT NULL DEFAULT '{}',
    created_on  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tips (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    comments_priv   TEXT NOT NULL DEFAULT '',
    network         TEXT NOT NULL,
    value_in_eth    REAL NOT NULL DEFAULT 0,
    created_on      INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tips_comments_priv ON tips(comments_priv, network);

CREATE TABLE IF NOT EXISTS trust_scores (
    id                          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id                     INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    last_apu_score              TEXT NOT NULL,
    max_apu_score               TEXT NOT NULL,
    trust_bonus                 TEXT NOT NULL,
    last_apu_calculation_time   INTEGER NOT NULL,
    max_apu_calculation_time    INTEGER NOT NULL,
    created_on                  INTEGER NOT NULL,
    modified_on                 INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS likes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id  INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    created_on  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_likes_activity ON likes(activity_id);

CREATE TABLE IF NOT EXISTS flags (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id  INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    created_on  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_flags_activity ON flags(activity_id);

CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id  INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    comment     TEXT NOT NULL,
    created_on  INTEGER NOT NULL,
    modified_on INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_activity ON comments(activity_id);

CREATE TABLE IF NOT EXISTS offers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    from_name   TEXT NOT NULL DEFAULT '',
    from_link   TEXT NOT NULL DEFAULT '',
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    url         TEXT NOT NULL,
    valid_from  INTEGER NOT NULL,
    valid_to    INTEGER NOT NULL,
    key         TEXT NOT NULL,
    style       TEXT NOT NULL,
    persona_id  INTEGER,
    created_by  INTEGER REFERENCES profiles(id) ON DELETE CASCADE,
    public      INTEGER NOT NULL DEFAULT 1,
    view_count  INTEGER NOT NULL DEFAULT 0,
    created_on  INTEGER NOT NULL,
    modified_on INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_offers_window ON offers(valid_from, valid_to);

CREATE TABLE IF NOT EXISTS offer_actions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id  INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    offer_id    INTEGER NOT NULL REFERENCES offers(id) ON DELETE CASCADE,
    what        TEXT NOT NULL,
    created_on  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS announcements (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    key         TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    valid_from  INTEGER NOT NULL,
    valid_to    INTEGER NOT NULL,
    rank        INTEGER NOT NULL DEFAULT 0,
    style       TEXT NOT NULL,
    created_on  INTEGER NOT NULL,
    modified_on INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_announcements_window ON announcements(valid_from, valid_to);

CREATE TABLE IF NOT EXISTS grants (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    metadata    TEXT NOT NULL DEFAULT '{}',
    modified_on INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS initial_token_distributions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id  INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    claim_total TEXT NOT NULL,
    created_on  INTEGER NOT NULL
);
";

/// Store backed by a single SQLite connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Self::init(conn)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("SQLite schema ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

pub(crate) fn to_millis(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

pub(crate) fn from_millis(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}

/// Parse a text column through `FromStr`.
pub(crate) fn parse_text<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    idx: usize,
    raw: String,
) -> rusqlite::Result<T> {
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Map a failed write, turning uniqueness failures into
/// [`StoreError::UniqueViolation`] for `what`.
pub(crate) fn write_error(e: rusqlite::Error, what: &str) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY) =>
        {
            StoreError::UniqueViolation(what.to_string())
        }
        _ => StoreError::Database(e),
    }
}

/// Map a failed read, reporting undecodable columns as corrupt data.
pub(crate) fn read_error(e: rusqlite::Error) -> StoreError {
    match e {
        e @ (rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)) => StoreError::Corrupt(e.to_string()),
        other => StoreError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_open_in_memory_applies_schema() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.conn().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('trust_scores', 'offers', 'announcements', 'initial_token_distributions')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.conn().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
    }

    #[test]
    fn test_millis_round_trip() {
        let t = Utc.with_ymd_and_hms(2020, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(from_millis(0, to_millis(t)).unwrap(), t);
    }

    #[test]
    fn test_unique_failure_is_mapped() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.conn().unwrap();
        conn.execute("INSERT INTO users (username) VALUES ('owocki')", [])
            .unwrap();
        let err = conn
            .execute("INSERT INTO users (username) VALUES ('owocki')", [])
            .unwrap_err();

        assert!(matches!(
            write_error(err, "users.username"),
            StoreError::UniqueViolation(_)
        ));
    }
}
