//! Run statistics and the final report artifact.
//!
//! Workers never touch these accumulators directly; the orchestrator
//! merges [`crate::importer::ImportOutcome`]s into a [`FolderStats`]
//! behind a single mutex and assembles the [`RunStats`] when the run
//! finishes. [`RunReport`] is the user-facing artifact: a plain-text
//! rendering (with a capped error listing) and a JSON form.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::importer::ImportOutcome;

/// Per-folder accumulator.
#[derive(Debug, Clone, Serialize)]
pub struct FolderStats {
    /// Folder path as configured (doubles as the quarter label).
    pub folder: String,
    /// Files attempted (equals files enumerated unless cancelled).
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub rows_written: usize,
    /// `filename: reason` strings, in completion order.
    pub errors: Vec<String>,
    /// Sum of per-file processing time, in seconds.
    pub processing_secs: f64,
}

impl FolderStats {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            total_files: 0,
            succeeded: 0,
            failed: 0,
            rows_written: 0,
            errors: Vec::new(),
            processing_secs: 0.0,
        }
    }

    /// Merge one file outcome. Callers serialize access (mutex).
    pub fn record(&mut self, outcome: &ImportOutcome) {
        self.total_files += 1;
        self.processing_secs += outcome.processing_time.as_secs_f64();
        if outcome.success {
            self.succeeded += 1;
            self.rows_written += outcome.rows;
        } else {
            self.failed += 1;
            let reason = outcome.error.as_deref().unwrap_or("unknown error");
            self.errors.push(format!("{}: {reason}", outcome.filename));
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total_files as f64 * 100.0
        }
    }

    pub fn avg_processing_secs(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.processing_secs / self.total_files as f64
        }
    }
}

/// Aggregate statistics for one whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub duration_secs: f64,
    /// Worker-pool size used (1 for sequential runs).
    pub workers: usize,
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub rows_written: usize,
    pub folders: Vec<FolderStats>,
}

impl RunStats {
    /// Assemble run totals from finished folder accumulators.
    pub fn from_folders(
        folders: Vec<FolderStats>,
        started_at: DateTime<Local>,
        finished_at: DateTime<Local>,
        workers: usize,
    ) -> Self {
        let total_files = folders.iter().map(|f| f.total_files).sum();
        let succeeded = folders.iter().map(|f| f.succeeded).sum();
        let failed = folders.iter().map(|f| f.failed).sum();
        let rows_written = folders.iter().map(|f| f.rows_written).sum();
        let duration_secs = (finished_at - started_at)
            .to_std()
            .unwrap_or_default()
            .as_secs_f64();
        Self {
            started_at,
            finished_at,
            duration_secs,
            workers,
            total_files,
            succeeded,
            failed,
            rows_written,
            folders,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total_files as f64 * 100.0
        }
    }
}

/// The per-run report artifact.
///
/// `Display` renders the text form; the error listing is truncated to
/// `error_cap` entries per folder (the counts are never suppressed, only
/// the detail).
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub stats: RunStats,
    pub error_cap: usize,
}

impl RunReport {
    pub fn new(stats: RunStats, error_cap: usize) -> Self {
        Self { stats, error_cap }
    }

    /// JSON rendering of the full report (errors uncapped).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the text rendering to a file.
    pub fn save_text(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, format!("{self}"))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "batch import report")?;
        writeln!(
            f,
            "  time range: {} - {} ({:.1}s)",
            s.started_at.format("%Y-%m-%d %H:%M:%S"),
            s.finished_at.format("%Y-%m-%d %H:%M:%S"),
            s.duration_secs
        )?;
        writeln!(f, "  workers: {}", s.workers)?;
        writeln!(
            f,
            "  files: {} total, {} succeeded, {} failed ({:.1}% success)",
            s.total_files,
            s.succeeded,
            s.failed,
            s.success_rate()
        )?;
        writeln!(f, "  rows written: {}", s.rows_written)?;
        writeln!(f, "  folders:")?;
        for folder in &s.folders {
            writeln!(
                f,
                "    {}: {}/{} ({:.1}%), rows={}, avg {:.2}s/file",
                folder.folder,
                folder.succeeded,
                folder.total_files,
                folder.success_rate(),
                folder.rows_written,
                folder.avg_processing_secs()
            )?;
            for error in folder.errors.iter().take(self.error_cap) {
                writeln!(f, "      - {error}")?;
            }
            if folder.errors.len() > self.error_cap {
                writeln!(
                    f,
                    "      ... {} more errors",
                    folder.errors.len() - self.error_cap
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Local;

    use super::{FolderStats, RunReport, RunStats};
    use crate::importer::ImportOutcome;

    fn outcome(filename: &str, success: bool, rows: usize) -> ImportOutcome {
        ImportOutcome {
            filename: filename.to_string(),
            folder: "113Q1".to_string(),
            success,
            rows,
            processing_time: Duration::from_millis(10),
            error: if success {
                None
            } else {
                Some("unsupported file type".to_string())
            },
        }
    }

    #[test]
    fn folder_stats_accumulate_outcomes() {
        let mut stats = FolderStats::new("113Q1");
        stats.record(&outcome("a_lvr_land_a.csv", true, 5));
        stats.record(&outcome("bad.csv", false, 0));

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.rows_written, 5);
        assert_eq!(stats.errors, vec!["bad.csv: unsupported file type"]);
        assert!((stats.success_rate() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn report_caps_error_listing_but_keeps_counts() {
        let mut folder = FolderStats::new("113Q1");
        for i in 0..5 {
            folder.record(&outcome(&format!("bad{i}.csv"), false, 0));
        }
        let now = Local::now();
        let stats = RunStats::from_folders(vec![folder], now, now, 1);
        let report = RunReport::new(stats, 3);

        let text = format!("{report}");
        assert!(text.contains("5 failed"));
        assert!(text.contains("bad0.csv"));
        assert!(text.contains("bad2.csv"));
        assert!(!text.contains("bad3.csv"));
        assert!(text.contains("... 2 more errors"));
    }

    #[test]
    fn empty_run_has_zero_success_rate() {
        let now = Local::now();
        let stats = RunStats::from_folders(vec![], now, now, 1);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.total_files, 0);
    }
}
