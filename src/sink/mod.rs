//! Data-sink abstraction.
//!
//! The pipeline writes through the [`Sink`] trait: create a logical
//! database if absent, create a table if absent, insert a cleaned batch.
//! Two implementations ship with the crate:
//!
//! - [`SqliteSink`]: one SQLite file per logical database under a root
//!   directory
//! - [`MemorySink`]: an in-memory recording sink for tests and dry-run
//!   verification
//!
//! Concurrent inserts into the same table from multiple workers are the
//! sink's problem to make safe (SQLite WAL + busy timeout here); the
//! orchestrator does not serialize inserts across files.

mod memory;
mod sqlite;

pub use memory::MemorySink;
pub use sqlite::SqliteSink;

use crate::classify::Database;
use crate::error::SinkError;
use crate::tables::ColumnSpec;
use crate::types::{RecordBatch, Value};

/// Numeric magnitude beyond which a value is written as NULL instead,
/// to avoid downstream overflow in consumers of the tables.
pub const MAX_NUMERIC_MAGNITUDE: f64 = 1e15;

/// A destination for cleaned record batches.
///
/// All methods return failure as a [`Result`]; the caller decides
/// whether to log-and-continue or escalate. `ensure_*` methods are
/// idempotent check-then-create and are not expected to be called
/// concurrently for the same target.
pub trait Sink: Send + Sync {
    /// Create the logical database if it does not already exist.
    fn ensure_database(&self, database: Database) -> Result<(), SinkError>;

    /// Create `table` in `database` if it does not already exist.
    fn ensure_table(
        &self,
        database: Database,
        table: &str,
        columns: &[ColumnSpec],
    ) -> Result<(), SinkError>;

    /// Insert a batch into `table`, `chunk_size` rows at a time,
    /// committing once for the whole call. Returns the number of rows
    /// written.
    fn insert_batch(
        &self,
        database: Database,
        table: &str,
        batch: &RecordBatch,
        chunk_size: usize,
    ) -> Result<usize, SinkError>;
}

/// Clamp a value to the sink's numeric range.
///
/// `|v| > 1e15` (and non-finite values) become [`Value::Null`].
pub(crate) fn clamp_magnitude(value: &Value) -> Value {
    match value {
        Value::Number(n) if !n.is_finite() || n.abs() > MAX_NUMERIC_MAGNITUDE => Value::Null,
        other => other.clone(),
    }
}
