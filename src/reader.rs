//! CSV reading with text-encoding fallback.
//!
//! Government extracts arrive in a mix of encodings: newer quarters are
//! UTF-8 (sometimes with a BOM), older ones Big5/CP950, and a few stray
//! files GBK. A file is read as raw bytes and decoded with each
//! configured encoding in order; the first encoding that decodes without
//! errors wins. If none do, the file fails with
//! [`ImportError::Undecodable`].
//!
//! Some source variants carry a second, bilingual header row directly
//! under the real header; [`ReadOptions::skip_leading_records`] drops it
//! before the rows reach the cleaner.

use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{ImportError, ImportResult};
use crate::types::{RecordBatch, Value};

/// Options controlling how a source file is read.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Encoding labels tried in order (WHATWG labels; `cp950` resolves
    /// to Big5). Unknown labels are skipped.
    pub encodings: Vec<String>,
    /// Number of data records dropped directly after the header row.
    /// The quarterly extracts repeat the header in English on row two.
    pub skip_leading_records: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            encodings: vec!["utf-8".to_string(), "big5".to_string(), "gbk".to_string()],
            skip_leading_records: 1,
        }
    }
}

/// Read one CSV file into a [`RecordBatch`] of raw text cells.
pub fn read_batch_from_path(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> ImportResult<RecordBatch> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    read_batch_from_bytes(&bytes, path, options)
}

/// Decode and parse raw file bytes.
///
/// `path` is only used for error reporting.
pub fn read_batch_from_bytes(
    bytes: &[u8],
    path: &Path,
    options: &ReadOptions,
) -> ImportResult<RecordBatch> {
    let mut tried = Vec::with_capacity(options.encodings.len());

    for label in &options.encodings {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            tracing::warn!(label, "unknown encoding label, skipping");
            continue;
        };
        tried.push(label.clone());

        // `decode` BOM-sniffs and reports whether any byte sequence was
        // malformed under this encoding; a single error disqualifies the
        // candidate and the next one is tried.
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            continue;
        }

        let batch = parse_csv(&text, options)?;
        tracing::debug!(
            path = %path.display(),
            encoding = encoding.name(),
            rows = batch.row_count(),
            "decoded"
        );
        return Ok(batch);
    }

    Err(ImportError::Undecodable {
        path: path.to_path_buf(),
        tried,
    })
}

fn parse_csv(text: &str, options: &ReadOptions) -> ImportResult<RecordBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let width = columns.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records().skip(options.skip_leading_records) {
        let record = result?;
        // Ragged records are padded/truncated to the header width.
        let row = (0..width)
            .map(|i| Value::Text(record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(RecordBatch::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{read_batch_from_bytes, ReadOptions};
    use crate::error::ImportError;
    use crate::types::Value;

    fn opts_no_skip() -> ReadOptions {
        ReadOptions {
            skip_leading_records: 0,
            ..ReadOptions::default()
        }
    }

    #[test]
    fn utf8_parses_directly() {
        let input = "編號,總價元\nA1,100\n";
        let batch =
            read_batch_from_bytes(input.as_bytes(), Path::new("x.csv"), &opts_no_skip()).unwrap();
        assert_eq!(batch.columns, vec!["編號", "總價元"]);
        assert_eq!(batch.rows[0][1], Value::Text("100".to_string()));
    }

    #[test]
    fn big5_file_falls_back_past_utf8() {
        let input = "編號,鄉鎮市區\nA1,中正區\n";
        let (big5_bytes, _, had_errors) = encoding_rs::BIG5.encode(input);
        assert!(!had_errors);

        let batch =
            read_batch_from_bytes(&big5_bytes, Path::new("x.csv"), &opts_no_skip()).unwrap();
        assert_eq!(batch.columns, vec!["編號", "鄉鎮市區"]);
        assert_eq!(batch.rows[0][1], Value::Text("中正區".to_string()));
    }

    #[test]
    fn undecodable_bytes_fail_with_tried_list() {
        // 0xFF is an invalid lead byte in UTF-8, Big5, and GBK alike.
        let bytes = [b'a', b',', b'b', b'\n', 0xFF, 0xFF, b',', b'x', b'\n'];
        let err =
            read_batch_from_bytes(&bytes, Path::new("x.csv"), &opts_no_skip()).unwrap_err();
        match err {
            ImportError::Undecodable { tried, .. } => assert_eq!(tried.len(), 3),
            other => panic!("expected Undecodable, got {other}"),
        }
    }

    #[test]
    fn secondary_header_row_is_skipped() {
        let input = "編號,總價元\nserial number,total price\nA1,100\n";
        let batch = read_batch_from_bytes(
            input.as_bytes(),
            Path::new("x.csv"),
            &ReadOptions::default(),
        )
        .unwrap();
        assert_eq!(batch.row_count(), 1);
        assert_eq!(batch.rows[0][0], Value::Text("A1".to_string()));
    }

    #[test]
    fn ragged_rows_are_padded_to_header_width() {
        let input = "a,b,c\n1,2\n";
        let batch =
            read_batch_from_bytes(input.as_bytes(), Path::new("x.csv"), &opts_no_skip()).unwrap();
        assert_eq!(batch.rows[0].len(), 3);
        assert_eq!(batch.rows[0][2], Value::Text(String::new()));
    }
}
