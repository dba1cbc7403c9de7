//! Key-value blob repositories.
//!
//! # Responsibility
//! - Store and fetch opaque UTF-8 blobs by key.
//! - Provide a durable SQLite backend and a process-local in-memory backend.
//!
//! # Invariants
//! - `put` fully replaces the previous value for the key.
//! - `get` of an unknown key is `Ok(None)`, not an error.

use crate::db::DbError;
use crate::model::record::ImportError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for blob persistence and payload decoding.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("failed to serialize notes: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("stored payload under `{key}` is unreadable: {source}")]
    InvalidPayload {
        key: String,
        #[source]
        source: ImportError,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("blob backend unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value blob storage contract.
pub trait BlobRepository {
    /// Returns the blob stored under `key`, if any.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces the blob stored under `key`.
    fn put(&mut self, key: &str, value: &str) -> RepoResult<()>;
    /// Deletes `key`. Returns whether a value existed.
    fn remove(&mut self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed blob repository over the `kv_entries` table.
pub struct SqliteBlobRepository {
    conn: Connection,
}

impl SqliteBlobRepository {
    /// Wraps a migrated connection after verifying the schema it needs.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl BlobRepository for SqliteBlobRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

/// Process-local blob repository; contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobRepository {
    entries: HashMap<String, String>,
}

impl InMemoryBlobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one entry, e.g. a payload written by an earlier session.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl BlobRepository for InMemoryBlobRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "kv_entries")? {
        return Err(RepoError::MissingRequiredTable("kv_entries"));
    }
    for column in ["key", "value", "updated_at"] {
        if !table_has_column(conn, "kv_entries", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "kv_entries",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{BlobRepository, InMemoryBlobRepository, RepoError, SqliteBlobRepository};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn sqlite_put_replaces_previous_value() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let mut repo = SqliteBlobRepository::try_new(conn).expect("schema should be ready");

        assert_eq!(repo.get("k").expect("get should succeed"), None);
        repo.put("k", "one").expect("first put");
        repo.put("k", "two").expect("second put");
        assert_eq!(repo.get("k").expect("get").as_deref(), Some("two"));

        assert!(repo.remove("k").expect("remove should succeed"));
        assert!(!repo.remove("k").expect("second remove should succeed"));
    }

    #[test]
    fn sqlite_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().expect("raw connection should open");
        let err = SqliteBlobRepository::try_new(conn)
            .err()
            .expect("missing table must be rejected");
        assert!(matches!(err, RepoError::MissingRequiredTable("kv_entries")));
    }

    #[test]
    fn in_memory_round_trips_entries() {
        let mut repo = InMemoryBlobRepository::new().with_entry("seed", "[]");
        assert_eq!(repo.get("seed").expect("get").as_deref(), Some("[]"));
        repo.put("other", "x").expect("put");
        assert_eq!(repo.get("other").expect("get").as_deref(), Some("x"));
    }
}
