//! SQLite-backed definition cache.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use super::entry::Record;

/// Errors raised by the cache store itself.
///
/// These never reach the user as lookup failures; the orchestrator logs them
/// and carries on as if the cache were cold.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The database could not be opened or a statement failed.
    #[error("Cache database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record content could not be serialized.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The directory holding the database could not be created.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// What a [`CacheStore::put`] did to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// No record existed for the key; one was inserted.
    Inserted,
    /// A record existed with structurally equal content; nothing was written.
    Unchanged,
    /// A record existed with different content; it was replaced in place.
    Updated,
}

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS record (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    word    TEXT NOT NULL,
    source  TEXT NOT NULL,
    content TEXT NOT NULL,
    UNIQUE (word, source)
)";

/// Persistent store of [`Record`]s keyed by `(word, source)`.
///
/// Each store owns one connection, opened on construction and closed on drop.
/// Several stores may point at the same file; SQLite's per-statement
/// atomicity is what keeps them consistent.
pub struct CacheStore {
    conn: Connection,
}

impl CacheStore {
    /// Opens or creates the cache database at `path`.
    ///
    /// The parent directory is created if needed and the table is created if
    /// it does not exist, so this is safe to call on every start.
    pub fn open(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        log::debug!("Opened cache database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Opens a private in-memory cache (nothing is persisted).
    pub fn open_in_memory() -> CacheResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> CacheResult<Self> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self { conn })
    }

    /// Point lookup. `Ok(None)` is a plain cache miss.
    pub fn get(&self, word: &str, source: &str) -> CacheResult<Option<Record>> {
        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT content FROM record WHERE word = ?1 AND source = ?2",
                params![word, source],
                |row| row.get(0),
            )
            .optional()?;

        match row {
            Some(text) => {
                let content: Value = serde_json::from_str(&text)?;
                Ok(Some(Record::new(word, source, content)))
            }
            None => Ok(None),
        }
    }

    /// Write-through a freshly queried record.
    ///
    /// Inserts when the key is new, skips the write when the stored content
    /// is structurally equal, and updates in place otherwise.
    pub fn put(&self, record: &Record) -> CacheResult<PutOutcome> {
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT content FROM record WHERE word = ?1 AND source = ?2",
                params![record.word, record.source],
                |row| row.get(0),
            )
            .optional()?;

        let serialized = serde_json::to_string(&record.content)?;

        let Some(stored) = existing else {
            self.conn.execute(
                "INSERT INTO record (word, source, content) VALUES (?1, ?2, ?3)",
                params![record.word, record.source, serialized],
            )?;
            return Ok(PutOutcome::Inserted);
        };

        // Unparseable stored text is treated as stale and overwritten.
        let unchanged = serde_json::from_str::<Value>(&stored)
            .map(|value| value == record.content)
            .unwrap_or(false);
        if unchanged {
            return Ok(PutOutcome::Unchanged);
        }

        self.conn.execute(
            "UPDATE record SET content = ?1 WHERE word = ?2 AND source = ?3",
            params![serialized, record.word, record.source],
        )?;
        Ok(PutOutcome::Updated)
    }

    /// Total number of cached records.
    pub fn len(&self) -> CacheResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM record", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Distinct cached words starting with `prefix`, sorted, at most `limit`.
    pub fn words_with_prefix(&self, prefix: &str, limit: usize) -> CacheResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT word FROM record
             WHERE substr(word, 1, length(?1)) = ?1
             ORDER BY word LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![prefix, limit], |row| row.get::<_, String>(0))?;

        let mut words = Vec::new();
        for row in rows {
            words.push(row?);
        }
        Ok(words)
    }
}
