//! FILENAME: app/src/logging.rs
// PURPOSE: Unified logging backend for the `log` facade.
// FORMAT: seq|level|category|message  (category = log target)

use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global log file handle
pub static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

static LOGGER: UnifiedLogger = UnifiedLogger;

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

/// One-letter level code used in the log line.
pub fn level_code(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug => "D",
        log::Level::Trace => "T",
    }
}

pub fn format_line(seq: u64, level: &str, category: &str, message: &str) -> String {
    format!("{}|{}|{}|{}", seq, level, category, message)
}

/// Opens (or creates) the log file in append mode.
pub fn init_log_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut guard = LOG_FILE
        .lock()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Lock error: {}", e)))?;
    *guard = Some(file);
    Ok(())
}

/// Write a log line in unified format
pub fn write_log(level: &str, category: &str, message: &str) {
    let line = format_line(next_seq(), level, category, message);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("[LOG_ERROR] Failed to write: {}", e);
            }
            let _ = file.flush();
        }
    }

    eprintln!("{}", line);
}

/// Installs the unified backend and sets the maximum level.
/// Calling it again only updates the level and the log file.
pub fn init(level: log::LevelFilter, log_file: Option<&Path>) -> io::Result<()> {
    if let Some(path) = log_file {
        init_log_file(path)?;
    }
    // A logger can only be installed once per process
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    Ok(())
}

struct UnifiedLogger;

impl log::Log for UnifiedLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        write_log(
            level_code(record.level()),
            record.target(),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "ENTER {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "ENTER {} {}", $func, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "EXIT {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "EXIT {} {}", $func, format!($($arg)*))
    };
}

pub use log_enter;
pub use log_exit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(format_line(7, "W", "EXPORT", "No data to export"), "7|W|EXPORT|No data to export");
    }

    #[test]
    fn test_level_codes() {
        assert_eq!(level_code(log::Level::Error), "E");
        assert_eq!(level_code(log::Level::Warn), "W");
        assert_eq!(level_code(log::Level::Info), "I");
        assert_eq!(level_code(log::Level::Debug), "D");
        assert_eq!(level_code(log::Level::Trace), "T");
    }

    #[test]
    fn test_seq_increases() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }

    #[test]
    fn test_lines_reach_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("export.log");

        init(log::LevelFilter::Info, Some(&path)).unwrap();
        log::warn!(target: "EXPORT", "logging test marker");
        log::debug!(target: "EXPORT", "filtered debug marker");
        log::logger().flush();

        let content = std::fs::read_to_string(&path).unwrap();
        let line = content
            .lines()
            .find(|l| l.ends_with("logging test marker"))
            .unwrap();
        let parts: Vec<&str> = line.splitn(4, '|').collect();
        assert!(parts[0].parse::<u64>().is_ok());
        assert_eq!(parts[1], "W");
        assert_eq!(parts[2], "EXPORT");
        assert!(!content.contains("filtered debug marker"));
    }
}
