//! FILENAME: app/src/cli.rs
//! Command line front end: load records, export the pivot into a directory.

use crate::config::AppConfig;
use crate::export::{export_pivot_table, ExportOutcome};
use crate::logging;
use crate::sink::DirectorySink;
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use pivot_engine::{MissingValuePolicy, Record, SortOrder, DEFAULT_MISSING_LABEL};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pivot-export")]
#[command(about = "Count records by two fields and export the pivot as a styled XLSX summary")]
#[command(version)]
pub struct Cli {
    /// Records file (.json array/envelope or .xlsx with a header row)
    pub input: PathBuf,

    /// Field whose distinct values become the rows
    #[arg(short, long)]
    pub row_key: String,

    /// Field whose distinct values become the columns
    #[arg(short, long)]
    pub col_key: String,

    /// Name of the downloaded file (default: data_summary.xlsx)
    #[arg(short, long)]
    pub file_name: Option<String>,

    /// Sheet title shown in the first row
    #[arg(long)]
    pub title: Option<String>,

    /// Header of the row label column
    #[arg(long)]
    pub row_header: Option<String>,

    /// Label of the totals row and column
    #[arg(long)]
    pub total_label: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Sheet to read records from (.xlsx input only)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Treatment of records without a row or column value
    #[arg(long, value_enum)]
    pub missing: Option<MissingMode>,

    /// Label of the bucket collecting records without a value
    #[arg(long)]
    pub missing_label: Option<String>,

    /// Order of the rows and columns
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Replace an existing output file
    #[arg(long)]
    pub overwrite: bool,

    /// Print the computed counts as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Append log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingMode {
    Bucket,
    Skip,
    Reject,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderArg {
    Source,
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Source => SortOrder::SourceOrder,
            OrderArg::Asc => SortOrder::Ascending,
            OrderArg::Desc => SortOrder::Descending,
        }
    }
}

impl Cli {
    /// Overlays the flags that were given on top of `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if self.overwrite {
            config.overwrite = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.log_file = Some(file.clone());
        }

        let export = &mut config.export;
        if let Some(name) = &self.file_name {
            export.file_name = name.clone();
        }
        if let Some(title) = &self.title {
            export.layout.title = title.clone();
        }
        if let Some(header) = &self.row_header {
            export.layout.row_label_header = header.clone();
        }
        if let Some(label) = &self.total_label {
            export.layout.total_label = label.clone();
        }
        if let Some(order) = self.order {
            export.order = order.into();
        }

        // A label alone implies the bucket mode
        let mode = self
            .missing
            .or_else(|| self.missing_label.as_ref().map(|_| MissingMode::Bucket));
        export.missing_values = match mode {
            Some(MissingMode::Bucket) => {
                let label = self
                    .missing_label
                    .clone()
                    .or_else(|| export.missing_values.label().map(str::to_string))
                    .unwrap_or_else(|| DEFAULT_MISSING_LABEL.to_string());
                MissingValuePolicy::Bucket { label }
            }
            Some(MissingMode::Skip) => MissingValuePolicy::Skip,
            Some(MissingMode::Reject) => MissingValuePolicy::Reject,
            None => export.missing_values.clone(),
        };
    }
}

// ============================================================================
// INPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Xlsx,
}

impl InputFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(InputFormat::Json),
            Some("xlsx") | Some("xlsm") => Ok(InputFormat::Xlsx),
            _ => bail!("Unsupported input {:?}: expected a .json or .xlsx file", path),
        }
    }
}

pub fn load_records(path: &Path, sheet: Option<&str>) -> Result<Vec<Record>> {
    let records = match InputFormat::detect(path)? {
        InputFormat::Json => persistence::load_records_json(path),
        InputFormat::Xlsx => persistence::load_records_xlsx(path, sheet),
    }
    .with_context(|| format!("Failed to load records from {:?}", path))?;

    log::info!(target: "CLI", "Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

// ============================================================================
// RUN
// ============================================================================

pub fn run(cli: &Cli) -> Result<ExportOutcome> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    let level = config.log_level_filter()?;
    logging::init(level, config.log_file.as_deref())
        .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
    log::debug!(target: "CONFIG", "Effective configuration: {:?}", config);

    let records = load_records(&cli.input, cli.sheet.as_deref())?;

    let mut sink = DirectorySink::new(&config.out_dir).with_overwrite(config.overwrite);
    let outcome = export_pivot_table(&records, &cli.row_key, &cli.col_key, &config.export, &mut sink)
        .context("Export failed")?;

    match &outcome {
        ExportOutcome::Skipped => {
            log::info!(target: "CLI", "Input {:?} holds no records, nothing written", cli.input);
        }
        ExportOutcome::Delivered { delivery, summary } => {
            if cli.summary_json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            }
            if let Some(path) = &delivery.location {
                log::info!(target: "CLI", "Saved {:?}", path);
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pivot-export"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_required_keys() {
        assert!(Cli::try_parse_from(["pivot-export", "in.json"]).is_err());
        assert!(Cli::try_parse_from(["pivot-export", "in.json", "--row-key", "a"]).is_err());

        let cli = parse(&["in.json", "--row-key", "provider", "--col-key", "status"]);
        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.row_key, "provider");
        assert_eq!(cli.col_key, "status");
        assert!(!cli.overwrite);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "in.json", "-r", "provider", "-c", "status",
            "--file-name", "out.xlsx",
            "--title", "Thuê bao",
            "--row-header", "Nhà mạng",
            "--total-label", "Total",
            "--out-dir", "exports",
            "--order", "desc",
            "--missing", "skip",
            "--overwrite",
            "--log-level", "debug",
        ]);
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.out_dir, PathBuf::from("exports"));
        assert!(config.overwrite);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.export.file_name, "out.xlsx");
        assert_eq!(config.export.layout.title, "Thuê bao");
        assert_eq!(config.export.layout.row_label_header, "Nhà mạng");
        assert_eq!(config.export.layout.total_label, "Total");
        assert_eq!(config.export.order, SortOrder::Descending);
        assert_eq!(config.export.missing_values, MissingValuePolicy::Skip);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = parse(&["in.json", "-r", "a", "-c", "b"]);
        let mut config = AppConfig {
            overwrite: true,
            ..AppConfig::default()
        };
        config.export.missing_values = MissingValuePolicy::Reject;
        let before = config.clone();

        cli.apply_to(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_missing_label_implies_bucket() {
        let cli = parse(&["in.json", "-r", "a", "-c", "b", "--missing-label", "(trống)"]);
        let mut config = AppConfig::default();
        config.export.missing_values = MissingValuePolicy::Reject;

        cli.apply_to(&mut config);
        assert_eq!(
            config.export.missing_values,
            MissingValuePolicy::Bucket { label: "(trống)".to_string() }
        );

        let cli = parse(&["in.json", "-r", "a", "-c", "b", "--missing", "bucket"]);
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.export.missing_values.label(), Some(DEFAULT_MISSING_LABEL));
    }

    #[test]
    fn test_invalid_enum_values() {
        assert!(Cli::try_parse_from(["pivot-export", "in.json", "-r", "a", "-c", "b", "--order", "random"]).is_err());
        assert!(Cli::try_parse_from(["pivot-export", "in.json", "-r", "a", "-c", "b", "--missing", "drop"]).is_err());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(InputFormat::detect(Path::new("a.json")).unwrap(), InputFormat::Json);
        assert_eq!(InputFormat::detect(Path::new("A.XLSX")).unwrap(), InputFormat::Xlsx);
        assert!(InputFormat::detect(Path::new("a.csv")).is_err());
        assert!(InputFormat::detect(Path::new("records")).is_err());
    }
}
