//! Folder/batch orchestration.
//!
//! Enumerates the configured folders, analyzes the file distribution,
//! and dispatches every file to the single-file importer, sequentially
//! or across a bounded rayon pool. Workers merge their outcomes into a
//! per-folder accumulator through one mutex; nothing else is shared, so
//! sequential and parallel runs over the same input produce identical
//! aggregate statistics (only timing and completion order differ).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::classify;
use crate::config::ImportConfig;
use crate::error::SetupError;
use crate::importer::{provision_sink, FileImporter};
use crate::jurisdiction;
use crate::sink::Sink;
use crate::stats::{FolderStats, RunReport, RunStats};

/// Execution mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Deterministic order, one file at a time.
    Sequential,
    /// Bounded worker pool, unordered completion.
    Parallel,
}

/// Cooperative cancellation for a whole batch run.
///
/// Cancelling stops new files from being dispatched; in-flight files
/// finish and stay counted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// File counts bucketed by estimated size (line count).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeBuckets {
    /// Fewer than 1000 lines.
    pub small: usize,
    /// 1000 to 9999 lines.
    pub medium: usize,
    /// 10000 lines or more.
    pub large: usize,
}

/// Distribution analysis of the enumerated files.
///
/// This is the whole output of a dry run and is logged before a real
/// run starts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunAnalysis {
    pub total_files: usize,
    /// Files per folder, in configuration order.
    pub files_per_folder: Vec<(String, usize)>,
    /// Classified files per description (e.g. 中古屋主要資料).
    pub by_description: BTreeMap<String, usize>,
    /// Files per jurisdiction name.
    pub by_jurisdiction: BTreeMap<String, usize>,
    /// Files matching no known suffix.
    pub unclassified: usize,
    pub size_buckets: SizeBuckets,
}

/// Output of [`BatchOrchestrator::run`].
#[derive(Debug)]
pub enum RunOutput {
    /// Dry-run mode: analysis only, the sink was never touched.
    DryRun(RunAnalysis),
    /// A real run with its report.
    Completed(RunReport),
}

/// Drives a whole batch run against one sink and one config.
pub struct BatchOrchestrator<'a> {
    sink: &'a dyn Sink,
    config: &'a ImportConfig,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(sink: &'a dyn Sink, config: &'a ImportConfig) -> Self {
        Self { sink, config }
    }

    /// Run the batch in `mode`.
    ///
    /// Fails fast only on setup problems (no folders configured, sink
    /// unreachable); every per-file and per-folder problem degrades to
    /// an outcome or a warning.
    pub fn run(&self, mode: RunMode) -> Result<RunOutput, SetupError> {
        self.run_cancellable(mode, &CancelToken::new())
    }

    /// [`Self::run`] with cooperative cancellation.
    pub fn run_cancellable(
        &self,
        mode: RunMode,
        cancel: &CancelToken,
    ) -> Result<RunOutput, SetupError> {
        if self.config.folders.is_empty() {
            return Err(SetupError::NoFolders);
        }

        let scanned = self.scan_folders();
        let analysis = self.analyze(&scanned);
        log_analysis(&analysis);

        if self.config.dry_run {
            tracing::info!("dry run requested, skipping import");
            return Ok(RunOutput::DryRun(analysis));
        }

        provision_sink(self.sink).map_err(SetupError::SinkUnavailable)?;

        let workers = match mode {
            RunMode::Sequential => 1,
            RunMode::Parallel => self.config.effective_workers(),
        };
        let pool = match mode {
            RunMode::Sequential => None,
            RunMode::Parallel => Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .expect("failed to build rayon thread pool"),
            ),
        };

        let started_at = chrono::Local::now();
        let mut folders = Vec::new();

        for (label, files) in &scanned {
            if files.is_empty() {
                tracing::warn!(folder = %label, "no CSV files, skipping");
                continue;
            }
            tracing::info!(folder = %label, files = files.len(), workers, "importing folder");
            let folder_stats = self.import_folder(pool.as_ref(), label, files, cancel);
            tracing::info!(
                folder = %label,
                succeeded = folder_stats.succeeded,
                failed = folder_stats.failed,
                rows = folder_stats.rows_written,
                "folder done"
            );
            folders.push(folder_stats);
        }

        let finished_at = chrono::Local::now();
        let stats = RunStats::from_folders(folders, started_at, finished_at, workers);
        tracing::info!(
            total = stats.total_files,
            succeeded = stats.succeeded,
            failed = stats.failed,
            rows = stats.rows_written,
            "run complete"
        );
        Ok(RunOutput::Completed(RunReport::new(
            stats,
            self.config.error_cap,
        )))
    }

    /// Enumerate `*.csv` in every configured folder (non-recursive).
    ///
    /// A missing folder is a warning, not an error: it appears with an
    /// empty file list and the rest of the run proceeds.
    pub fn scan_folders(&self) -> Vec<(String, Vec<PathBuf>)> {
        let mut scanned = Vec::with_capacity(self.config.folders.len());
        for folder in &self.config.folders {
            let label = folder_label(folder);
            if !folder.is_dir() {
                tracing::warn!(folder = %folder.display(), "folder does not exist");
                scanned.push((label, Vec::new()));
                continue;
            }
            let pattern = folder.join("*.csv");
            let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
                .map(|paths| paths.filter_map(Result::ok).collect())
                .unwrap_or_default();
            files.sort();
            tracing::info!(folder = %folder.display(), files = files.len(), "scanned");
            scanned.push((label, files));
        }
        scanned
    }

    /// Classify every enumerated file for statistics purposes.
    pub fn analyze(&self, scanned: &[(String, Vec<PathBuf>)]) -> RunAnalysis {
        let mut analysis = RunAnalysis::default();

        for (label, files) in scanned {
            analysis
                .files_per_folder
                .push((label.clone(), files.len()));
            for path in files {
                analysis.total_files += 1;
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();

                match classify::classify(&filename) {
                    Some(class) => {
                        *analysis
                            .by_description
                            .entry(class.description())
                            .or_insert(0) += 1;
                    }
                    None => analysis.unclassified += 1,
                }
                if let Some(jur) = jurisdiction::from_filename(&filename) {
                    *analysis
                        .by_jurisdiction
                        .entry(jur.name.to_string())
                        .or_insert(0) += 1;
                }

                match estimate_lines(path) {
                    n if n < 1000 => analysis.size_buckets.small += 1,
                    n if n < 10000 => analysis.size_buckets.medium += 1,
                    _ => analysis.size_buckets.large += 1,
                }
            }
        }
        analysis
    }

    fn import_folder(
        &self,
        pool: Option<&rayon::ThreadPool>,
        label: &str,
        files: &[PathBuf],
        cancel: &CancelToken,
    ) -> FolderStats {
        let importer = FileImporter::new(self.sink, self.config);
        // The single serialization point for worker results.
        let stats = Mutex::new(FolderStats::new(label));

        let process = |path: &PathBuf| {
            if cancel.is_cancelled() {
                return;
            }
            let outcome = importer.import_file(path, label);
            stats
                .lock()
                .expect("stats mutex poisoned")
                .record(&outcome);
        };

        match pool {
            None => files.iter().for_each(process),
            Some(pool) => pool.install(|| files.par_iter().for_each(process)),
        }

        stats.into_inner().expect("stats mutex poisoned")
    }
}

/// Batch/quarter label for a folder: its final path component.
fn folder_label(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.to_string_lossy().into_owned())
}

/// Cheap line-count estimate for the size buckets. Counting newline
/// bytes is encoding-safe for the encodings in play (no multi-byte
/// sequence in Big5/GBK contains 0x0A). Unreadable files count as
/// small, matching the analysis-only role of the estimate.
fn estimate_lines(path: &Path) -> usize {
    match std::fs::read(path) {
        Ok(bytes) => bytes.iter().filter(|&&b| b == b'\n').count(),
        Err(_) => 0,
    }
}

fn log_analysis(analysis: &RunAnalysis) {
    tracing::info!(
        total = analysis.total_files,
        unclassified = analysis.unclassified,
        small = analysis.size_buckets.small,
        medium = analysis.size_buckets.medium,
        large = analysis.size_buckets.large,
        "file distribution"
    );
    for (description, count) in &analysis.by_description {
        tracing::info!(kind = %description, count = *count, "file type");
    }
    for (city, count) in &analysis.by_jurisdiction {
        tracing::info!(city = %city, count = *count, "jurisdiction");
    }
}
