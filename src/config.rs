//! Run configuration.
//!
//! One [`ImportConfig`] is constructed at startup (in code or from a
//! TOML file) and passed by reference into the orchestrator. Nothing in
//! the classification or cleaning logic reads ambient state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reader::ReadOptions;

/// Configuration for a batch import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Source folders to scan for CSV files (non-recursive). The folder
    /// name doubles as the batch/quarter label stamped onto every row.
    pub folders: Vec<PathBuf>,

    /// Rows per insert chunk (progress granularity; the sink still
    /// commits once per file).
    pub chunk_size: usize,

    /// Worker-pool size for parallel runs. `None` uses the platform's
    /// available parallelism.
    pub workers: Option<usize>,

    /// Enumerate and analyze only; never touch the sink.
    pub dry_run: bool,

    /// Encoding labels tried in order when reading a file.
    pub encodings: Vec<String>,

    /// Data records dropped directly after the header row (the extracts
    /// repeat the header in English on row two).
    pub skip_leading_records: usize,

    /// Maximum error messages listed per folder in the rendered report.
    pub error_cap: usize,

    /// Per-file deadline in seconds, checked between pipeline stages.
    /// `None` disables the check.
    pub file_timeout_secs: Option<u64>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let read = ReadOptions::default();
        Self {
            folders: Vec::new(),
            chunk_size: 1000,
            workers: None,
            dry_run: false,
            encodings: read.encodings,
            skip_leading_records: read.skip_leading_records,
            error_cap: 3,
            file_timeout_secs: None,
        }
    }
}

impl ImportConfig {
    /// Load a config from a TOML file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Worker count to use for a parallel run.
    pub fn effective_workers(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    /// Reader options derived from this config.
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            encodings: self.encodings.clone(),
            skip_leading_records: self.skip_leading_records,
        }
    }

    /// Per-file deadline, if configured.
    pub fn file_timeout(&self) -> Option<Duration> {
        self.file_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::ImportConfig;

    #[test]
    fn defaults_are_sensible() {
        let config = ImportConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.encodings, vec!["utf-8", "big5", "gbk"]);
        assert_eq!(config.skip_leading_records, 1);
        assert!(!config.dry_run);
        assert!(config.effective_workers() >= 1);
        assert!(config.file_timeout().is_none());
    }

    #[test]
    fn toml_round_trip_overrides_defaults() {
        let text = r#"
            folders = ["113Q1", "113Q2"]
            chunk_size = 500
            workers = 4
            dry_run = true
            error_cap = 5
        "#;
        let config: ImportConfig = toml::from_str(text).unwrap();
        assert_eq!(config.folders.len(), 2);
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.workers, Some(4));
        assert!(config.dry_run);
        assert_eq!(config.error_cap, 5);
        // Unspecified fields keep their defaults.
        assert_eq!(config.skip_leading_records, 1);
    }
}
