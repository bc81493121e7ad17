use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Convenience result type for per-file import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type for a single file-import attempt.
///
/// Every variant terminates only that file's processing; the orchestrator
/// records it as data (an [`crate::importer::ImportOutcome`] with an error
/// string) and the run continues.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The filename matches none of the known category/subtype suffixes.
    #[error("unsupported file type: {filename}")]
    UnsupportedFileType { filename: String },

    /// The filename does not encode a recognized jurisdiction code.
    #[error("unrecognized jurisdiction: {filename}")]
    UnknownJurisdiction { filename: String },

    /// None of the configured text encodings decoded the file.
    #[error("undecodable: {} (tried {tried:?})", path.display())]
    Undecodable { path: PathBuf, tried: Vec<String> },

    /// The batch was empty after reading, or empty after cleaning.
    #[error("no rows remain after cleaning")]
    NoRowsRemain,

    /// The per-file deadline expired between pipeline stages.
    #[error("timed out after {elapsed:?} in stage {stage}")]
    Timeout { stage: &'static str, elapsed: Duration },

    /// Table creation or insert failed in the sink.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error after a successful decode.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error type returned by [`crate::sink::Sink`] implementations.
#[derive(Debug, Error)]
pub enum SinkError {
    /// SQLite-level failure (connectivity, constraint, malformed statement).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A batch referenced a column the destination table does not declare.
    #[error("unknown column '{column}' for table {table}")]
    UnknownColumn { table: String, column: String },

    /// Sink-specific failure that is not tied to a statement.
    #[error("{0}")]
    Other(String),
}

/// Error loading an [`crate::config::ImportConfig`] from a TOML file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::config::ImportConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Setup-time failures that make a whole run meaningless.
///
/// These are the only conditions the orchestrator aborts on; everything
/// else degrades to a per-file or per-folder outcome.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The configuration names no source folders at all.
    #[error("no source folders configured")]
    NoFolders,

    /// The sink could not be reached before any file was attempted.
    #[error("sink unavailable: {0}")]
    SinkUnavailable(#[source] SinkError),
}
