//! Core tabular types for the import pipeline.
//!
//! A CSV file is read into a [`RecordBatch`]: a header row plus row-major
//! [`Value`] storage. A freshly-read batch contains only [`Value::Text`]
//! cells; [`crate::clean`] coerces the declared numeric columns and
//! normalizes the rest.

/// A single cell in a [`RecordBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/absent value. Written as SQL NULL by the sink.
    Null,
    /// Numeric value (after cleaning).
    Number(f64),
    /// UTF-8 string.
    Text(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the cell carries no information: null, or an
    /// empty/whitespace-only string.
    ///
    /// Textual absence is represented as the empty string rather than
    /// [`Value::Null`], so blank-row detection must treat both as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(_) => false,
        }
    }

    /// Numeric view of the cell, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view of the cell, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// In-memory tabular record batch.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as `columns`.
/// A batch is owned by exactly one file-import operation; it is never
/// shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    /// Column names as they appear in the source file's header.
    pub columns: Vec<String>,
    /// Row-major cell storage; every row has `columns.len()` cells.
    pub rows: Vec<Vec<Value>>,
}

impl RecordBatch {
    /// Create a batch from a header and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row length differs from the header length.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        for (i, row) in rows.iter().enumerate() {
            assert!(
                row.len() == width,
                "row {i} has {} cells, header has {width}",
                row.len()
            );
        }
        Self { columns, rows }
    }

    /// Number of rows in the batch.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the batch has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Insert a column at the front of every row with the same value.
    pub fn prepend_constant(&mut self, name: impl Into<String>, value: Value) {
        self.columns.insert(0, name.into());
        for row in &mut self.rows {
            row.insert(0, value.clone());
        }
    }

    /// Append a column at the end of every row with the same value.
    pub fn append_constant(&mut self, name: impl Into<String>, value: Value) {
        self.columns.push(name.into());
        for row in &mut self.rows {
            row.push(value.clone());
        }
    }

    /// Drop rows for which every cell is blank (see [`Value::is_blank`]).
    pub fn drop_blank_rows(&mut self) {
        self.rows.retain(|row| row.iter().any(|v| !v.is_blank()));
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordBatch, Value};

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn blank_detection_covers_null_and_empty_text() {
        assert!(Value::Null.is_blank());
        assert!(text("").is_blank());
        assert!(text("  ").is_blank());
        assert!(!text("0").is_blank());
        assert!(!Value::Number(0.0).is_blank());
    }

    #[test]
    fn drop_blank_rows_keeps_partially_filled_rows() {
        let mut batch = RecordBatch::new(
            vec!["a".into(), "b".into()],
            vec![vec![text(""), Value::Null], vec![text("x"), Value::Null]],
        );
        batch.drop_blank_rows();
        assert_eq!(batch.row_count(), 1);
        assert_eq!(batch.rows[0][0], text("x"));
    }

    #[test]
    fn prepend_and_append_constant_grow_every_row() {
        let mut batch = RecordBatch::new(
            vec!["編號".into()],
            vec![vec![text("A1")], vec![text("A2")]],
        );
        batch.prepend_constant("縣市代碼", text("a"));
        batch.append_constant("quarter", text("113Q1"));

        assert_eq!(batch.columns, vec!["縣市代碼", "編號", "quarter"]);
        assert_eq!(batch.rows[0], vec![text("a"), text("A1"), text("113Q1")]);
        assert_eq!(batch.rows[1], vec![text("a"), text("A2"), text("113Q1")]);
    }
}
