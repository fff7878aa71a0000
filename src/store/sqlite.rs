//! SQLite storage backend
//!
//! One row per decision, embedded migrations managed via PRAGMA
//! user_version. Insertion order is the rowid sequence; record field
//! encodings (RFC 3339 timestamps, JSON arrays) match the JSONL backend so
//! the two are interchangeable views of the same data model.

use crate::error::{Error, Result};
use crate::types::{ContextMap, Decision};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::backend::StorageBackend;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: decision journal
    r#"
    CREATE TABLE IF NOT EXISTS decisions (
        seq          INTEGER PRIMARY KEY AUTOINCREMENT,
        id           TEXT NOT NULL UNIQUE,
        timestamp    DATETIME NOT NULL,
        category     TEXT NOT NULL,
        decision     TEXT NOT NULL,
        rationale    TEXT NOT NULL DEFAULT '',
        alternatives JSON NOT NULL DEFAULT '[]',
        impact       TEXT NOT NULL,
        tags         JSON NOT NULL DEFAULT '[]',
        context      JSON NOT NULL DEFAULT '{}'
    );

    CREATE INDEX IF NOT EXISTS idx_decisions_timestamp ON decisions(timestamp);
    CREATE INDEX IF NOT EXISTS idx_decisions_category ON decisions(category);
    CREATE INDEX IF NOT EXISTS idx_decisions_impact ON decisions(impact);
    "#,
];

fn run_migrations(conn: &Connection) -> Result<()> {
    let current: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for version in current..SCHEMA_VERSION {
        let migration = MIGRATIONS[version as usize];
        conn.execute_batch(migration)?;
        conn.pragma_update(None, "user_version", version + 1)?;
        tracing::debug!(version = version + 1, "applied journal schema migration");
    }

    Ok(())
}

/// SQLite-backed decision storage.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open or create a journal database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        // WAL keeps a second reading process from blocking the writer
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            ",
        )?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Raw column values, parsed into a `Decision` outside the rusqlite closure
/// so enum/JSON errors surface as storage errors rather than panics.
type RawRow = (
    String,         // id
    String,         // timestamp
    String,         // category
    String,         // decision
    String,         // rationale
    String,         // alternatives
    String,         // impact
    String,         // tags
    String,         // context
);

fn parse_row(row: RawRow) -> Result<Decision> {
    let (id, timestamp, category, decision, rationale, alternatives, impact, tags, context) = row;

    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("bad timestamp for decision {}: {}", id, e)))?;
    let category = category
        .parse()
        .map_err(|e| Error::Storage(format!("bad category for decision {}: {}", id, e)))?;
    let impact = impact
        .parse()
        .map_err(|e| Error::Storage(format!("bad impact for decision {}: {}", id, e)))?;
    let alternatives: Vec<String> = serde_json::from_str(&alternatives)
        .map_err(|e| Error::Storage(format!("bad alternatives for decision {}: {}", id, e)))?;
    let tags: Vec<String> = serde_json::from_str(&tags)
        .map_err(|e| Error::Storage(format!("bad tags for decision {}: {}", id, e)))?;
    let context: ContextMap = serde_json::from_str(&context)
        .map_err(|e| Error::Storage(format!("bad context for decision {}: {}", id, e)))?;

    Ok(Decision {
        id,
        timestamp,
        category,
        decision,
        rationale,
        alternatives,
        impact,
        tags,
        context,
    })
}

impl StorageBackend for SqliteBackend {
    fn load(&self) -> Result<Vec<Decision>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, timestamp, category, decision, rationale,
                   alternatives, impact, tags, context
            FROM decisions
            ORDER BY seq ASC
            "#,
        )?;

        let rows: Vec<RawRow> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                ))
            })?
            .collect::<std::result::Result<_, _>>()?;

        rows.into_iter().map(parse_row).collect()
    }

    fn append(&mut self, decision: &Decision) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO decisions (id, timestamp, category, decision, rationale,
                                   alternatives, impact, tags, context)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                decision.id,
                decision.timestamp.to_rfc3339(),
                decision.category.as_str(),
                decision.decision,
                decision.rationale,
                serde_json::to_string(&decision.alternatives)?,
                decision.impact.as_str(),
                serde_json::to_string(&decision.tags)?,
                serde_json::to_string(&decision.context)?,
            ],
        )?;
        Ok(())
    }
}

/// Path of the journal database for a project root (convenience for tools
/// that only have the root path).
pub fn database_path(journal_dir: &Path) -> PathBuf {
    journal_dir.join(crate::config::StorageKind::Sqlite.data_file())
}
