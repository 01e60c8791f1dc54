//! FILENAME: app/src/error.rs

use persistence::PersistenceError;
use pivot_engine::PivotError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Pivot calculation failed: {0}")]
    Pivot(#[from] PivotError),

    #[error("Workbook serialization failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Failed to deliver '{file_name}': {source}")]
    Sink {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
}
