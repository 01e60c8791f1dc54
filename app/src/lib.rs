//! FILENAME: app/src/lib.rs
//! Pivot export library: counts records into a two-field pivot and delivers
//! it as a styled XLSX summary workbook.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod sink;

pub use config::AppConfig;
pub use error::{ConfigError, ExportError};
pub use export::{export_pivot_table, summary_workbook, ExportOptions, ExportOutcome, DEFAULT_FILE_NAME};
pub use sink::{DeliveredFile, Delivery, DirectorySink, DownloadSink, MemorySink};

pub use pivot_engine::{CrossTab, MissingValuePolicy, Record, SortOrder, SummaryLayout};
