//! Single-file import pipeline.
//!
//! One file moves through classify → read → clean → decorate → insert,
//! strictly ordered and single-threaded. The first failing stage is
//! final for that file: the error becomes part of the returned
//! [`ImportOutcome`] and the caller owns any retry policy (the batch
//! orchestrator has none; a failed file is recorded and the run moves
//! on).

use std::path::Path;
use std::time::{Duration, Instant};

use crate::classify;
use crate::clean::clean_batch;
use crate::config::ImportConfig;
use crate::error::{ImportError, ImportResult};
use crate::jurisdiction;
use crate::reader;
use crate::sink::Sink;
use crate::tables;
use crate::types::Value;

/// Result of one file-import attempt.
///
/// Created once per attempt and consumed only by the orchestrator for
/// aggregation; never persisted.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Source filename (no path).
    pub filename: String,
    /// Batch/quarter label of the folder the file came from.
    pub folder: String,
    pub success: bool,
    /// Rows written on success, 0 otherwise.
    pub rows: usize,
    pub processing_time: Duration,
    /// Failure reason, present iff `success` is false.
    pub error: Option<String>,
}

/// Imports one file at a time against a provisioned sink.
///
/// The orchestrator creates the destination databases and tables before
/// any file is dispatched, so the importer itself only inserts.
pub struct FileImporter<'a> {
    sink: &'a dyn Sink,
    config: &'a ImportConfig,
}

impl<'a> FileImporter<'a> {
    pub fn new(sink: &'a dyn Sink, config: &'a ImportConfig) -> Self {
        Self { sink, config }
    }

    /// Import one file, stamping `folder_label` onto every row.
    ///
    /// Never panics and never returns `Err`; every failure mode is
    /// folded into the outcome.
    pub fn import_file(&self, path: &Path, folder_label: &str) -> ImportOutcome {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let started = Instant::now();

        match self.run_pipeline(path, &filename, folder_label, started) {
            Ok(rows) => {
                let processing_time = started.elapsed();
                tracing::info!(
                    file = %filename,
                    folder = folder_label,
                    rows,
                    elapsed_ms = processing_time.as_millis() as u64,
                    "imported"
                );
                ImportOutcome {
                    filename,
                    folder: folder_label.to_string(),
                    success: true,
                    rows,
                    processing_time,
                    error: None,
                }
            }
            Err(err) => {
                let processing_time = started.elapsed();
                tracing::warn!(file = %filename, folder = folder_label, error = %err, "import failed");
                ImportOutcome {
                    filename,
                    folder: folder_label.to_string(),
                    success: false,
                    rows: 0,
                    processing_time,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn run_pipeline(
        &self,
        path: &Path,
        filename: &str,
        folder_label: &str,
        started: Instant,
    ) -> ImportResult<usize> {
        let class = classify::classify(filename).ok_or_else(|| {
            ImportError::UnsupportedFileType {
                filename: filename.to_string(),
            }
        })?;
        let jur = jurisdiction::from_filename(filename).ok_or_else(|| {
            ImportError::UnknownJurisdiction {
                filename: filename.to_string(),
            }
        })?;

        let mut batch = reader::read_batch_from_path(path, &self.config.read_options())?;
        self.check_deadline(started, "read")?;

        clean_batch(&mut batch, class.subtype);
        if batch.is_empty() {
            return Err(ImportError::NoRowsRemain);
        }
        self.check_deadline(started, "clean")?;

        // Every row becomes self-describing for downstream audit: the
        // jurisdiction leads, the provenance trails.
        batch.prepend_constant("縣市名稱", Value::Text(jur.name.to_string()));
        batch.prepend_constant("縣市代碼", Value::Text(jur.code.to_string()));
        batch.append_constant("source_file", Value::Text(filename.to_string()));
        batch.append_constant("quarter", Value::Text(folder_label.to_string()));

        let target = class.target();
        let written =
            self.sink
                .insert_batch(target.database, target.table, &batch, self.config.chunk_size)?;
        Ok(written)
    }

    /// Cooperative per-file timeout, checked between pipeline stages.
    fn check_deadline(&self, started: Instant, stage: &'static str) -> ImportResult<()> {
        if let Some(limit) = self.config.file_timeout() {
            let elapsed = started.elapsed();
            if elapsed > limit {
                return Err(ImportError::Timeout { stage, elapsed });
            }
        }
        Ok(())
    }
}

/// Provision the destination databases and tables for every known
/// classification. Called once by the orchestrator before dispatch, so
/// `ensure_table` is never raced from the worker pool.
pub fn provision_sink(sink: &dyn Sink) -> Result<(), crate::error::SinkError> {
    use crate::classify::{Category, FileClass, Subtype};

    for category in [Category::Resale, Category::Presale, Category::Rental] {
        sink.ensure_database(category.database())?;
        for subtype in [
            Subtype::Main,
            Subtype::Building,
            Subtype::Land,
            Subtype::Parking,
        ] {
            let class = FileClass { category, subtype };
            let target = class.target();
            sink.ensure_table(target.database, target.table, &tables::table_columns(class))?;
        }
    }
    Ok(())
}
