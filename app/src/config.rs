//! FILENAME: app/src/config.rs
//! Centralized configuration for pivot-export.
//!
//! Sources, lowest precedence first: built-in defaults, a JSON config file,
//! environment variables, command line flags (applied by the CLI).

use crate::error::ConfigError;
use crate::export::ExportOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_OUT_DIR: &str = "PIVOT_EXPORT_OUT_DIR";
pub const ENV_LOG_LEVEL: &str = "PIVOT_EXPORT_LOG";
pub const ENV_LOG_FILE: &str = "PIVOT_EXPORT_LOG_FILE";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory exported workbooks are written to
    pub out_dir: PathBuf,
    /// Replace an existing file instead of picking "name (n).xlsx"
    pub overwrite: bool,
    /// off, error, warn, info, debug or trace
    pub log_level: String,
    /// Optional file that receives a copy of every log line
    pub log_file: Option<PathBuf>,
    pub export: ExportOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            out_dir: PathBuf::from("."),
            overwrite: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
            export: ExportOptions::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid by `path` when given, overlaid by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.log_level_filter()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields from environment variables. `lookup` returns the
    /// value of a variable; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_OUT_DIR) {
            self.out_dir = PathBuf::from(dir);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log_level = level.trim().to_string();
        }
        if let Some(file) = get(ENV_LOG_FILE) {
            self.log_file = Some(PathBuf::from(file));
        }
    }

    pub fn log_level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        log::LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}
