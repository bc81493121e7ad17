//! SQLite-backed sink: one database file per logical database.

use std::path::{Path, PathBuf};

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

use crate::classify::Database;
use crate::error::SinkError;
use crate::tables::{ColumnSpec, ColumnType};
use crate::types::{RecordBatch, Value};

use super::{clamp_magnitude, Sink};

/// Writes batches into SQLite files under a root directory
/// (`<root>/LVR_UsedHouse.db` and siblings).
///
/// The sink holds no open connections; every call opens its own, the way
/// each import in the source system opened its own session. WAL mode
/// plus a busy timeout make concurrent per-file inserts from the worker
/// pool safe without cross-file coordination.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    root: PathBuf,
}

impl SqliteSink {
    /// Create a sink rooted at `root`. The directory is created by
    /// [`Sink::ensure_database`], not here.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing a logical database.
    pub fn database_path(&self, database: Database) -> PathBuf {
        self.root.join(format!("{}.db", database.name()))
    }

    fn open(&self, database: Database) -> Result<Connection, SinkError> {
        let conn = Connection::open(self.database_path(database))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(30))?;
        Ok(conn)
    }
}

/// Column and table names contain characters SQLite treats specially
/// (e.g. `建物現況格局-房`), so every identifier is double-quoted.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Text => "TEXT",
        ColumnType::Integer => "INTEGER",
        ColumnType::Real => "REAL",
    }
}

fn bind_value(value: &Value) -> SqlValue {
    match clamp_magnitude(value) {
        Value::Null => SqlValue::Null,
        Value::Number(n) => SqlValue::Real(n),
        Value::Text(s) => SqlValue::Text(s),
    }
}

impl Sink for SqliteSink {
    fn ensure_database(&self, database: Database) -> Result<(), SinkError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| SinkError::Other(format!("cannot create sink root: {e}")))?;
        // Opening creates the file if missing; also verifies it is
        // reachable and writable before any import is attempted.
        let _ = self.open(database)?;
        Ok(())
    }

    fn ensure_table(
        &self,
        database: Database,
        table: &str,
        columns: &[ColumnSpec],
    ) -> Result<(), SinkError> {
        let conn = self.open(database)?;
        let column_defs: Vec<String> = columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name), sql_type(c.ty)))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(table),
            column_defs.join(", ")
        );
        conn.execute(&sql, [])?;
        Ok(())
    }

    fn insert_batch(
        &self,
        database: Database,
        table: &str,
        batch: &RecordBatch,
        chunk_size: usize,
    ) -> Result<usize, SinkError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let chunk_size = chunk_size.max(1);

        let mut conn = self.open(database)?;
        let tx = conn.transaction()?;
        let mut written = 0usize;

        {
            let column_names: Vec<String> =
                batch.columns.iter().map(|c| quote_ident(c)).collect();
            let placeholders: Vec<String> =
                (1..=batch.columns.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(table),
                column_names.join(", "),
                placeholders.join(", ")
            );
            let mut stmt = tx.prepare(&sql)?;

            // Chunking bounds the progress-log granularity; the
            // transaction still commits once for the whole call, so a
            // failed file leaves nothing behind.
            for chunk in batch.rows.chunks(chunk_size) {
                for row in chunk {
                    stmt.execute(rusqlite::params_from_iter(row.iter().map(bind_value)))?;
                }
                written += chunk.len();
                tracing::debug!(
                    database = database.name(),
                    table,
                    progress = written,
                    total = batch.row_count(),
                    "insert progress"
                );
            }
        }

        tx.commit()?;
        Ok(written)
    }
}
