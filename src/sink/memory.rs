//! In-memory recording sink.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::classify::Database;
use crate::error::SinkError;
use crate::tables::ColumnSpec;
use crate::types::{RecordBatch, Value};

use super::{clamp_magnitude, Sink};

#[derive(Debug, Default)]
struct Inner {
    databases: BTreeSet<&'static str>,
    tables: BTreeMap<(&'static str, String), Vec<ColumnSpec>>,
    rows: BTreeMap<(&'static str, String), Vec<Vec<Value>>>,
    ensure_table_calls: usize,
    insert_calls: usize,
}

/// A [`Sink`] that records everything it is asked to do.
///
/// Used by tests as a spy (dry-run must produce zero table creations and
/// zero inserts) and to assert on exactly what was written. Inserts
/// validate batch columns against the ensured table spec, so a
/// mis-decorated batch fails here the same way it would against a real
/// table. `fail_inserts` turns every insert into an error, for
/// exercising the sink-failure path.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<Inner>,
    fail_inserts: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `insert_batch` always fails.
    pub fn failing() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            fail_inserts: true,
        }
    }

    /// Names of the databases ensured so far, in name order.
    pub fn databases(&self) -> Vec<&'static str> {
        let inner = self.inner.lock().expect("sink mutex poisoned");
        inner.databases.iter().copied().collect()
    }

    /// Number of `ensure_table` calls observed.
    pub fn ensure_table_calls(&self) -> usize {
        self.inner.lock().expect("sink mutex poisoned").ensure_table_calls
    }

    /// Number of `insert_batch` calls observed.
    pub fn insert_calls(&self) -> usize {
        self.inner.lock().expect("sink mutex poisoned").insert_calls
    }

    /// Total rows written across all tables.
    pub fn total_rows(&self) -> usize {
        let inner = self.inner.lock().expect("sink mutex poisoned");
        inner.rows.values().map(|rows| rows.len()).sum()
    }

    /// Rows written to one table, in insertion order.
    pub fn rows(&self, database: Database, table: &str) -> Vec<Vec<Value>> {
        let inner = self.inner.lock().expect("sink mutex poisoned");
        inner
            .rows
            .get(&(database.name(), table.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Column names of one ensured table.
    pub fn table_columns(&self, database: Database, table: &str) -> Option<Vec<String>> {
        let inner = self.inner.lock().expect("sink mutex poisoned");
        inner
            .tables
            .get(&(database.name(), table.to_string()))
            .map(|spec| spec.iter().map(|c| c.name.to_string()).collect())
    }
}

impl Sink for MemorySink {
    fn ensure_database(&self, database: Database) -> Result<(), SinkError> {
        let mut inner = self.inner.lock().expect("sink mutex poisoned");
        inner.databases.insert(database.name());
        Ok(())
    }

    fn ensure_table(
        &self,
        database: Database,
        table: &str,
        columns: &[ColumnSpec],
    ) -> Result<(), SinkError> {
        let mut inner = self.inner.lock().expect("sink mutex poisoned");
        inner.ensure_table_calls += 1;
        inner
            .tables
            .entry((database.name(), table.to_string()))
            .or_insert_with(|| columns.to_vec());
        Ok(())
    }

    fn insert_batch(
        &self,
        database: Database,
        table: &str,
        batch: &RecordBatch,
        _chunk_size: usize,
    ) -> Result<usize, SinkError> {
        let mut inner = self.inner.lock().expect("sink mutex poisoned");
        inner.insert_calls += 1;

        if self.fail_inserts {
            return Err(SinkError::Other("injected insert failure".to_string()));
        }

        let key = (database.name(), table.to_string());
        let Some(spec) = inner.tables.get(&key) else {
            return Err(SinkError::Other(format!(
                "table {}.{table} was never created",
                database.name()
            )));
        };
        for column in &batch.columns {
            if !spec.iter().any(|c| c.name == column) {
                return Err(SinkError::UnknownColumn {
                    table: table.to_string(),
                    column: column.clone(),
                });
            }
        }

        let rows: Vec<Vec<Value>> = batch
            .rows
            .iter()
            .map(|row| row.iter().map(clamp_magnitude).collect())
            .collect();
        let written = rows.len();
        inner.rows.entry(key).or_default().extend(rows);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySink;
    use crate::classify::Database;
    use crate::error::SinkError;
    use crate::sink::Sink;
    use crate::tables::{ColumnSpec, ColumnType};
    use crate::types::{RecordBatch, Value};

    fn spec(names: &[&'static str]) -> Vec<ColumnSpec> {
        names
            .iter()
            .map(|name| ColumnSpec {
                name,
                ty: ColumnType::Text,
            })
            .collect()
    }

    #[test]
    fn records_tables_and_rows() {
        let sink = MemorySink::new();
        sink.ensure_database(Database::Rental).unwrap();
        sink.ensure_table(Database::Rental, "rental_data", &spec(&["編號"]))
            .unwrap();

        let batch = RecordBatch::new(
            vec!["編號".into()],
            vec![vec![Value::Text("R1".into())]],
        );
        let written = sink
            .insert_batch(Database::Rental, "rental_data", &batch, 100)
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(sink.total_rows(), 1);
        assert_eq!(sink.ensure_table_calls(), 1);
        assert_eq!(sink.databases(), vec!["LVR_Rental"]);
    }

    #[test]
    fn rejects_columns_outside_the_table_spec() {
        let sink = MemorySink::new();
        sink.ensure_table(Database::Rental, "rental_data", &spec(&["編號"]))
            .unwrap();

        let batch = RecordBatch::new(
            vec!["bogus".into()],
            vec![vec![Value::Text("x".into())]],
        );
        let err = sink
            .insert_batch(Database::Rental, "rental_data", &batch, 100)
            .unwrap_err();
        assert!(matches!(err, SinkError::UnknownColumn { .. }));
    }
}
