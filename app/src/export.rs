//! FILENAME: app/src/export.rs
//! PURPOSE: Pivot table export - records in, styled XLSX summary out.
//! CONTEXT: Counts records by a row field and a column field, renders the
//! counts with totals into a "Summary" sheet and hands the workbook bytes to
//! a download sink.

use crate::error::ExportError;
use crate::logging::{log_enter, log_exit};
use crate::sink::{Delivery, DownloadSink};
use persistence::{write_xlsx_buffer, Sheet, Workbook};
use pivot_engine::{
    calculate_crosstab, render_summary, CrossTab, MissingValuePolicy, PivotDefinition, Record,
    SortOrder, SummaryLayout, SummaryStyles,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FILE_NAME: &str = "data_summary.xlsx";

// ============================================================================
// OPTIONS
// ============================================================================

/// Everything about an export except the data and the two keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub file_name: String,
    pub layout: SummaryLayout,
    pub missing_values: MissingValuePolicy,
    /// Applied to both axes.
    pub order: SortOrder,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            file_name: DEFAULT_FILE_NAME.to_string(),
            layout: SummaryLayout::default(),
            missing_values: MissingValuePolicy::default(),
            order: SortOrder::SourceOrder,
        }
    }
}

impl ExportOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.layout.title = title.into();
        self
    }

    pub fn with_row_label_header(mut self, header: impl Into<String>) -> Self {
        self.layout.row_label_header = header.into();
        self
    }

    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn definition(&self, row_key: &str, col_key: &str) -> PivotDefinition {
        PivotDefinition::new(row_key, col_key)
            .with_missing_values(self.missing_values.clone())
            .with_order(self.order)
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// Nothing to export; the sink was not called.
    Skipped,
    Delivered {
        delivery: Delivery,
        summary: CrossTab,
    },
}

impl ExportOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ExportOutcome::Skipped)
    }

    pub fn delivery(&self) -> Option<&Delivery> {
        match self {
            ExportOutcome::Delivered { delivery, .. } => Some(delivery),
            ExportOutcome::Skipped => None,
        }
    }

    pub fn summary(&self) -> Option<&CrossTab> {
        match self {
            ExportOutcome::Delivered { summary, .. } => Some(summary),
            ExportOutcome::Skipped => None,
        }
    }
}

// ============================================================================
// EXPORT
// ============================================================================

/// Builds the single-sheet summary workbook for an already computed tab.
pub fn summary_workbook(tab: &CrossTab, layout: &SummaryLayout) -> Workbook {
    let rendered = render_summary(tab, layout, &SummaryStyles::standard());
    Workbook::from_sheet(Sheet::from_grid(
        rendered.name,
        &rendered.grid,
        &rendered.styles,
    ))
}

/// Counts `data` by `row_key` x `col_key`, writes the summary workbook and
/// delivers it to `sink` under `options.file_name`.
///
/// Empty `data` is not an error: a warning is logged, the sink is left
/// untouched and `ExportOutcome::Skipped` is returned.
pub fn export_pivot_table(
    data: &[Record],
    row_key: &str,
    col_key: &str,
    options: &ExportOptions,
    sink: &mut dyn DownloadSink,
) -> Result<ExportOutcome, ExportError> {
    log_enter!(
        "EXPORT",
        "export_pivot_table",
        "records={} row_key={} col_key={}",
        data.len(),
        row_key,
        col_key
    );

    if data.is_empty() {
        log::warn!(target: "EXPORT", "No data to export");
        log_exit!("EXPORT", "export_pivot_table", "skipped");
        return Ok(ExportOutcome::Skipped);
    }

    let definition = options.definition(row_key, col_key);
    let tab = calculate_crosstab(data, &definition)?;

    if tab.skipped > 0 {
        log::warn!(
            target: "EXPORT",
            "Skipped {} of {} records without a value for '{}' or '{}'",
            tab.skipped,
            data.len(),
            row_key,
            col_key
        );
    }

    let workbook = summary_workbook(&tab, &options.layout);
    let bytes = write_xlsx_buffer(&workbook)?;

    let delivery = sink
        .deliver(&options.file_name, &bytes)
        .map_err(|source| ExportError::Sink {
            file_name: options.file_name.clone(),
            source,
        })?;

    log::info!(
        target: "EXPORT",
        "Exported {}x{} summary ({} records) as '{}'",
        tab.row_count(),
        tab.column_count(),
        tab.grand_total,
        delivery.file_name
    );
    log_exit!("EXPORT", "export_pivot_table", "bytes={}", delivery.size);

    Ok(ExportOutcome::Delivered {
        delivery,
        summary: tab,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use engine::CellValue;
    use persistence::load_xlsx_from_bytes;
    use serde_json::{json, Value};
    use std::io;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                other => panic!("not an object: {}", other),
            })
            .collect()
    }

    struct FailingSink;

    impl DownloadSink for FailingSink {
        fn deliver(&mut self, _file_name: &str, _bytes: &[u8]) -> io::Result<Delivery> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.file_name, "data_summary.xlsx");
        assert_eq!(options.layout.title, "BẢNG TỔNG HỢP");
        assert_eq!(options.layout.row_label_header, "Nội dung");
        assert_eq!(options.order, SortOrder::SourceOrder);
    }

    #[test]
    fn test_empty_data_skips_sink() {
        let mut sink = MemorySink::new();
        let outcome =
            export_pivot_table(&[], "provider", "status", &ExportOptions::default(), &mut sink)
                .unwrap();

        assert!(outcome.is_skipped());
        assert!(outcome.delivery().is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_delivers_workbook() {
        let data = records(vec![
            json!({"rowKey": "A", "colKey": "X"}),
            json!({"rowKey": "A", "colKey": "Y"}),
            json!({"rowKey": "B", "colKey": "X"}),
        ]);
        let mut sink = MemorySink::new();
        let outcome =
            export_pivot_table(&data, "rowKey", "colKey", &ExportOptions::default(), &mut sink)
                .unwrap();

        let delivery = outcome.delivery().unwrap();
        assert_eq!(delivery.file_name, DEFAULT_FILE_NAME);
        assert_eq!(outcome.summary().unwrap().grand_total, 3);

        let file = sink.last().unwrap();
        assert_eq!(file.file_name, DEFAULT_FILE_NAME);
        assert_eq!(delivery.size, file.bytes.len());

        let workbook = load_xlsx_from_bytes(&file.bytes).unwrap();
        let sheet = workbook.sheet("Summary").unwrap();
        assert_eq!(sheet.value_at(4, 3), CellValue::Number(3.0));
    }

    #[test]
    fn test_custom_options_reach_workbook() {
        let data = records(vec![json!({"provider": "Viettel", "status": "active"})]);
        let options = ExportOptions::default()
            .with_file_name("providers.xlsx")
            .with_title("Thuê bao theo nhà mạng")
            .with_row_label_header("Nhà mạng");
        let mut sink = MemorySink::new();

        export_pivot_table(&data, "provider", "status", &options, &mut sink).unwrap();

        let file = sink.last().unwrap();
        assert_eq!(file.file_name, "providers.xlsx");
        let workbook = load_xlsx_from_bytes(&file.bytes).unwrap();
        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.value_at(0, 0), CellValue::Text("Thuê bao theo nhà mạng".to_string()));
        assert_eq!(sheet.value_at(1, 0), CellValue::Text("Nhà mạng".to_string()));
    }

    #[test]
    fn test_reject_policy_propagates() {
        let data = records(vec![
            json!({"provider": "Viettel", "status": "active"}),
            json!({"provider": "Mobifone"}),
        ]);
        let options = ExportOptions::default().with_missing_values(MissingValuePolicy::Reject);
        let mut sink = MemorySink::new();

        let err = export_pivot_table(&data, "provider", "status", &options, &mut sink).unwrap_err();
        match err {
            ExportError::Pivot(pivot_engine::PivotError::MissingField { index, field }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "status");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let data = records(vec![json!({"a": 1, "b": 2})]);
        let err = export_pivot_table(&data, "a", "b", &ExportOptions::default(), &mut FailingSink)
            .unwrap_err();

        match err {
            ExportError::Sink { file_name, source } => {
                assert_eq!(file_name, DEFAULT_FILE_NAME);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: ExportOptions = serde_json::from_str(
            r#"{"file_name":"x.xlsx","missing_values":{"mode":"skip"},"order":"ascending"}"#,
        )
        .unwrap();
        assert_eq!(options.file_name, "x.xlsx");
        assert_eq!(options.missing_values, MissingValuePolicy::Skip);
        assert_eq!(options.order, SortOrder::Ascending);
        assert_eq!(options.layout, SummaryLayout::default());
    }
}
