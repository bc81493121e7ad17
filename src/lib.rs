//! `lvr-importer` loads quarterly Taiwanese real-estate transaction
//! extracts (實價登錄 CSV drops) into per-category relational databases.
//!
//! Each extract filename encodes everything needed to route it:
//! `{city}_lvr_land_{a|b|c}[_build|_land|_park].csv`. The leading
//! letter is the jurisdiction (city/county) code, the `a`/`b`/`c`
//! letter selects resale / pre-sale / rental, and the optional tail
//! selects the building/land/parking sub-record. The pipeline per file
//! is classify → read (with encoding fallback) → clean → insert, and a
//! batch run fans files out across a bounded worker pool while
//! aggregating per-folder and global statistics into a final report.
//!
//! ## Quick example: classify a filename
//!
//! ```rust
//! use lvr_importer::{classify, jurisdiction};
//!
//! let class = classify::classify("f_lvr_land_a_build.csv").unwrap();
//! let target = class.target();
//! assert_eq!(target.database.name(), "LVR_UsedHouse");
//! assert_eq!(target.table, "build_data");
//!
//! let jur = jurisdiction::from_filename("f_lvr_land_a_build.csv").unwrap();
//! assert_eq!(jur.name, "新北市");
//! ```
//!
//! ## Quick example: run a batch import
//!
//! ```no_run
//! use lvr_importer::config::ImportConfig;
//! use lvr_importer::orchestrator::{BatchOrchestrator, RunMode, RunOutput};
//! use lvr_importer::sink::SqliteSink;
//!
//! # fn main() -> Result<(), lvr_importer::SetupError> {
//! let config = ImportConfig {
//!     folders: vec!["113Q1".into(), "113Q2".into()],
//!     ..ImportConfig::default()
//! };
//! let sink = SqliteSink::new("lvr-data");
//!
//! match BatchOrchestrator::new(&sink, &config).run(RunMode::Parallel)? {
//!     RunOutput::Completed(report) => println!("{report}"),
//!     RunOutput::DryRun(analysis) => println!("{} files found", analysis.total_files),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Set `dry_run` in the config to preview the scope of a run: the
//! orchestrator enumerates and classifies everything, reports the
//! distribution, and never touches the sink.
//!
//! ## Modules
//!
//! - [`classify`]: filename → (category, subtype) and destination routing
//! - [`jurisdiction`]: filename → city/county code and name
//! - [`reader`]: CSV reading with text-encoding fallback
//! - [`clean`]: row cleaning and numeric coercion per subtype
//! - [`tables`]: destination table column definitions
//! - [`sink`]: the data-sink trait plus SQLite and in-memory sinks
//! - [`importer`]: the single-file import pipeline
//! - [`orchestrator`]: folder scanning, dry-run analysis, worker pool
//! - [`stats`]: run statistics and the report artifact
//! - [`config`]: the run configuration object
//! - [`error`]: error types used across the pipeline

pub mod classify;
pub mod clean;
pub mod config;
pub mod error;
pub mod importer;
pub mod jurisdiction;
pub mod orchestrator;
pub mod reader;
pub mod sink;
pub mod stats;
pub mod tables;
pub mod types;

pub use error::{ImportError, ImportResult, SetupError, SinkError};
