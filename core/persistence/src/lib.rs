//! FILENAME: core/persistence/src/lib.rs
//! Persistence Module
//!
//! Writes summary workbooks to XLSX and reads records (JSON or XLSX) and
//! workbooks back in.

mod error;
mod json_reader;
mod xlsx_reader;
mod xlsx_writer;

pub use error::PersistenceError;
pub use json_reader::{load_records_json, parse_records_json};
pub use xlsx_reader::{
    load_records_xlsx, load_records_xlsx_from_bytes, load_xlsx, load_xlsx_from_bytes,
};
pub use xlsx_writer::{save_xlsx, write_xlsx_buffer};

use engine::{CellStyle, CellValue, Grid, StyleRegistry};
use serde_json::{Map, Value};

/// A record as loaded from disk: a JSON object keyed by column/field name.
pub type RecordMap = Map<String, Value>;

// ============================================================================
// WORKBOOK
// ============================================================================

/// Represents a complete workbook that can be saved/loaded
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    pub active_sheet: usize,
}

impl Workbook {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            active_sheet: 0,
        }
    }

    pub fn from_sheet(sheet: Sheet) -> Self {
        Self {
            sheets: vec![sheet],
            active_sheet: 0,
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SHEET
// ============================================================================

/// Represents a single worksheet. `styles[i]` is the style referenced by
/// cells with `style_index == i`; index 0 is the default style.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
    pub styles: Vec<CellStyle>,
}

impl Sheet {
    pub fn new(name: String) -> Self {
        Self {
            name,
            grid: Grid::new(),
            styles: vec![CellStyle::new()],
        }
    }

    pub fn from_grid(name: String, grid: &Grid, styles: &StyleRegistry) -> Self {
        Self {
            name,
            grid: grid.clone(),
            styles: styles.all_styles().to_vec(),
        }
    }

    /// Value at a position; Empty where nothing is stored.
    pub fn value_at(&self, row: u32, col: u32) -> CellValue {
        self.grid
            .get_cell(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    pub fn style_at(&self, row: u32, col: u32) -> Option<&CellStyle> {
        let cell = self.grid.get_cell(row, col)?;
        self.styles.get(cell.style_index)
    }
}
