//! Row cleaning and type coercion.
//!
//! The extracts are messy: numeric fields carry thousands separators and
//! stray unit characters, text fields carry embedded line breaks, and
//! absent values show up as empty strings or literal `nan`/`None`/`null`
//! tokens. Cleaning normalizes a batch in place:
//!
//! - entirely blank rows are dropped first;
//! - every declared numeric column (per subtype) is coerced to a number,
//!   with anything unparsable degrading to [`Value::Null`];
//! - every other column has CR/LF collapsed to a space, is trimmed, and
//!   has null-like tokens replaced by the empty string.
//!
//! Textual absence is the empty string while numeric absence is `Null`,
//! an intentional asymmetry preserved for compatibility with the
//! destination tables. Cleaning never fails: a cell that cannot be
//! coerced becomes absent, and only overall emptiness of the batch is
//! escalated by the importer.

use crate::classify::Subtype;
use crate::types::{RecordBatch, Value};

/// Literal tokens treated as absent values in source files.
const NULL_TOKENS: [&str; 3] = ["nan", "None", "null"];

/// Declared numeric columns for the main record.
///
/// Union of the column lists used by the resale/pre-sale/rental main
/// tables; columns absent from a given file are simply not touched.
const MAIN_NUMERIC: &[&str] = &[
    "土地移轉總面積平方公尺",
    "交易筆棟數",
    "總樓層數",
    "建物移轉總面積平方公尺",
    "建物現況格局-房",
    "建物現況格局-廳",
    "建物現況格局-衛",
    "總價元",
    "單價元平方公尺",
    "車位移轉總面積平方公尺",
    "車位總價元",
    "主建物面積",
    "附屬建物面積",
    "陽台面積",
    "土地面積平方公尺",
    "建物總面積平方公尺",
    "車位面積平方公尺",
    "車位總額元",
    "總額元",
    "租賃筆棟數",
    "屋齡",
    "建物移轉面積平方公尺",
    "土地移轉面積平方公尺",
    "權利人持分分母",
    "權利人持分分子",
    "車位價格",
];

const BUILDING_NUMERIC: &[&str] = &["屋齡", "建物移轉面積平方公尺", "總層數"];

const LAND_NUMERIC: &[&str] = &["土地移轉面積平方公尺", "權利人持分分母", "權利人持分分子"];

const PARKING_NUMERIC: &[&str] = &["車位價格", "車位面積平方公尺"];

/// Declared numeric column names for a subtype.
pub fn numeric_columns(subtype: Subtype) -> &'static [&'static str] {
    match subtype {
        Subtype::Main => MAIN_NUMERIC,
        Subtype::Building => BUILDING_NUMERIC,
        Subtype::Land => LAND_NUMERIC,
        Subtype::Parking => PARKING_NUMERIC,
    }
}

/// Clean a batch in place for the given subtype.
///
/// Idempotent: cleaning an already-cleaned batch changes nothing.
pub fn clean_batch(batch: &mut RecordBatch, subtype: Subtype) {
    batch.drop_blank_rows();

    let numeric: Vec<usize> = numeric_columns(subtype)
        .iter()
        .filter_map(|name| batch.column_index(name))
        .collect();

    for row in &mut batch.rows {
        for (idx, cell) in row.iter_mut().enumerate() {
            let is_numeric = numeric.contains(&idx);
            let next = if is_numeric {
                clean_numeric(cell)
            } else {
                clean_text(cell)
            };
            *cell = next;
        }
    }
}

/// Coerce one cell of a declared numeric column.
fn clean_numeric(cell: &Value) -> Value {
    match cell {
        Value::Null => Value::Null,
        Value::Number(n) => Value::Number(*n),
        Value::Text(raw) => {
            // Keep digits, decimal point, and minus sign; everything
            // else (thousands separators, units, full-width noise) goes.
            let stripped: String = raw
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            if stripped.is_empty() {
                return Value::Null;
            }
            // Stray `-`/`.` remainders fail the parse and degrade to
            // absent rather than raising.
            match stripped.parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => Value::Null,
            }
        }
    }
}

/// Normalize one cell of a textual column.
fn clean_text(cell: &Value) -> Value {
    match cell {
        Value::Null => Value::Text(String::new()),
        Value::Number(n) => Value::Number(*n),
        Value::Text(raw) => {
            let collapsed = raw.replace("\r\n", " ").replace(['\n', '\r'], " ");
            let trimmed = collapsed.trim();
            if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed) {
                Value::Text(String::new())
            } else {
                Value::Text(trimmed.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_batch, numeric_columns};
    use crate::classify::Subtype;
    use crate::types::{RecordBatch, Value};

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn batch(columns: &[&str], rows: Vec<Vec<Value>>) -> RecordBatch {
        RecordBatch::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn numeric_coercion_handles_separators_blanks_and_garbage() {
        let mut b = batch(
            &["總價元"],
            vec![
                vec![text("1,234.5")],
                vec![text("")],
                vec![text("abc")],
                vec![text("-12")],
            ],
        );
        clean_batch(&mut b, Subtype::Main);

        // The "" and "abc" rows are single-column and entirely blank/
        // non-numeric; "" is dropped as a blank row, "abc" survives with
        // an absent value.
        assert_eq!(
            b.rows,
            vec![
                vec![Value::Number(1234.5)],
                vec![Value::Null],
                vec![Value::Number(-12.0)],
            ]
        );
    }

    #[test]
    fn stray_minus_or_dot_degrade_to_absent() {
        let mut b = batch(&["車位價格"], vec![vec![text("-")], vec![text("..")]]);
        clean_batch(&mut b, Subtype::Parking);
        assert_eq!(b.rows, vec![vec![Value::Null], vec![Value::Null]]);
    }

    #[test]
    fn text_columns_collapse_linebreaks_and_null_tokens() {
        let mut b = batch(
            &["備註", "鄉鎮市區"],
            vec![
                vec![text("line1\r\nline2"), text("  中正區 ")],
                vec![text("nan"), text("null")],
            ],
        );
        clean_batch(&mut b, Subtype::Main);
        assert_eq!(b.rows[0][0], text("line1 line2"));
        assert_eq!(b.rows[0][1], text("中正區"));
        assert_eq!(b.rows[1][0], text(""));
        assert_eq!(b.rows[1][1], text(""));
    }

    #[test]
    fn entirely_blank_rows_are_dropped_partial_rows_survive() {
        let mut b = batch(
            &["編號", "屋齡"],
            vec![
                vec![text(""), text("")],
                vec![text("A1"), text("not a number")],
            ],
        );
        clean_batch(&mut b, Subtype::Building);

        // A row whose declared-numeric fields all fail to parse is
        // retained with absent values, not dropped.
        assert_eq!(b.row_count(), 1);
        assert_eq!(b.rows[0], vec![text("A1"), Value::Null]);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let mut b = batch(
            &["編號", "總價元", "備註"],
            vec![vec![text("A1"), text("1,000"), text("x\ny")]],
        );
        clean_batch(&mut b, Subtype::Main);
        let first = b.clone();
        clean_batch(&mut b, Subtype::Main);
        assert_eq!(b, first);
    }

    #[test]
    fn registries_declare_the_expected_subtype_fields() {
        assert!(numeric_columns(Subtype::Main).contains(&"屋齡"));
        assert_eq!(numeric_columns(Subtype::Building).len(), 3);
        assert_eq!(numeric_columns(Subtype::Land).len(), 3);
        assert_eq!(numeric_columns(Subtype::Parking).len(), 2);
    }
}
