//! Local index: note title -> remote topic/post identifiers.
//!
//! Backed by a single SQLite table. Every other component goes through
//! [`LocalIndex::lookup`] and [`LocalIndex::create_or_update`]; nothing else
//! touches the rows.

use crate::error::{Result, SyncError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL UNIQUE,
    remote_url TEXT,
    remote_post_id INTEGER,
    has_unadjusted_links INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- updated_at moves forward by at least one millisecond on every update.
CREATE TRIGGER IF NOT EXISTS notes_touch_updated_at
AFTER UPDATE ON notes
FOR EACH ROW
WHEN NEW.updated_at <= OLD.updated_at
BEGIN
    UPDATE notes
    SET updated_at = max(
        strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
        strftime('%Y-%m-%dT%H:%M:%fZ', OLD.updated_at, '+0.001 seconds')
    )
    WHERE id = NEW.id;
END;
";

const SELECT_COLUMNS: &str =
    "title, remote_url, remote_post_id, has_unadjusted_links, created_at, updated_at";

/// One row of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRecord {
    pub title: String,
    pub remote_url: Option<String>,
    pub remote_post_id: Option<i64>,
    /// Reserved for incremental re-linking; stored as given.
    pub has_unadjusted_links: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The persistent title index.
pub struct LocalIndex {
    conn: Connection,
}

impl LocalIndex {
    /// Open (or create) the index at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "Opening local index");
        Self::from_connection(Connection::open(path)?)
    }

    /// An index that lives only as long as the value. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        let index = Self { conn };
        index.initialize()?;
        Ok(index)
    }

    /// Create the table and trigger if they are missing. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Exact, case-sensitive lookup by title.
    pub fn lookup(&self, title: &str) -> Result<Option<NoteRecord>> {
        let sql = format!("SELECT {} FROM notes WHERE title = ?1", SELECT_COLUMNS);
        let record = self
            .conn
            .query_row(&sql, [title], read_record)
            .optional()?;
        record.transpose()
    }

    /// Insert a record for `title`, or update the existing one in place.
    ///
    /// A single upsert statement, so the existence check and the write can
    /// never interleave with another writer on the same database.
    pub fn create_or_update(
        &self,
        title: &str,
        remote_url: Option<&str>,
        remote_post_id: Option<i64>,
        has_unadjusted_links: bool,
    ) -> Result<()> {
        debug!(title, ?remote_post_id, "Recording note in local index");
        self.conn.execute(
            "INSERT INTO notes (title, remote_url, remote_post_id, has_unadjusted_links)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(title) DO UPDATE SET
                 remote_url = excluded.remote_url,
                 remote_post_id = excluded.remote_post_id,
                 has_unadjusted_links = excluded.has_unadjusted_links",
            params![title, remote_url, remote_post_id, has_unadjusted_links],
        )?;
        Ok(())
    }

    /// All records, ordered by title.
    pub fn records(&self) -> Result<Vec<NoteRecord>> {
        let sql = format!("SELECT {} FROM notes ORDER BY title", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Map a row; timestamp parsing errors surface as the inner `Result`.
fn read_record(row: &Row<'_>) -> rusqlite::Result<Result<NoteRecord>> {
    let title: String = row.get(0)?;
    let remote_url: Option<String> = row.get(1)?;
    let remote_post_id: Option<i64> = row.get(2)?;
    let has_unadjusted_links: bool = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    let created_at = parse_timestamp(&created_at);
    let updated_at = parse_timestamp(&updated_at);

    Ok(created_at.and_then(|created_at| {
        updated_at.map(|updated_at| NoteRecord {
            title,
            remote_url,
            remote_post_id,
            has_unadjusted_links,
            created_at,
            updated_at,
        })
    }))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| SyncError::Processing(format!("Bad timestamp '{}' in index: {}", value, e)))
}
