//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Lays a CrossTab out as a styled summary sheet.
//!
//! Layout (0-based rows):
//! - row 0: title, merged across the table width
//! - row 1: header (row label header, one column per item, total label)
//! - rows 2..2+N: one row per row item with its counts and row total
//! - row 2+N: totals row with column totals and the grand total

use serde::{Deserialize, Serialize};
use engine::{
    BorderStyle, Borders, Cell, CellRange, CellStyle, Grid, StyleRegistry, TextAlign,
};
use crate::engine::CrossTab;

pub const DEFAULT_SHEET_NAME: &str = "Summary";
pub const DEFAULT_TITLE: &str = "BẢNG TỔNG HỢP";
pub const DEFAULT_ROW_LABEL_HEADER: &str = "Nội dung";
pub const DEFAULT_TOTAL_LABEL: &str = "Tổng";
pub const LABEL_COLUMN_WIDTH: f64 = 30.0;
pub const DATA_COLUMN_WIDTH: f64 = 15.0;

/// Border applied to every table cell.
pub const TABLE_BORDERS: Borders = Borders::uniform(BorderStyle::medium());

pub const TITLE_ROW: u32 = 0;
pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 2;

// ============================================================================
// LAYOUT
// ============================================================================

/// Text and sizing of the summary sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryLayout {
    pub sheet_name: String,
    pub title: String,
    pub row_label_header: String,
    pub total_label: String,
    /// Width of the label column, in characters.
    pub label_column_width: f64,
    /// Width of every count column, in characters.
    pub data_column_width: f64,
    pub merge_title: bool,
}

impl Default for SummaryLayout {
    fn default() -> Self {
        SummaryLayout {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
            row_label_header: DEFAULT_ROW_LABEL_HEADER.to_string(),
            total_label: DEFAULT_TOTAL_LABEL.to_string(),
            label_column_width: LABEL_COLUMN_WIDTH,
            data_column_width: DATA_COLUMN_WIDTH,
            merge_title: true,
        }
    }
}

/// The fixed set of styles a summary uses. Built once and shared by every
/// cell of one role.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStyles {
    pub title: CellStyle,
    pub header: CellStyle,
    pub body: CellStyle,
    pub total: CellStyle,
}

impl SummaryStyles {
    pub fn standard() -> Self {
        let body = CellStyle::new().with_borders(TABLE_BORDERS);
        SummaryStyles {
            title: CellStyle::new().with_bold(true).with_text_align(TextAlign::Center),
            header: body.clone().with_bold(true).with_text_align(TextAlign::Center),
            total: body.clone().with_bold(true),
            body,
        }
    }
}

impl Default for SummaryStyles {
    fn default() -> Self {
        SummaryStyles::standard()
    }
}

// ============================================================================
// SUMMARY SHEET
// ============================================================================

/// A rendered summary: the sheet grid plus the registry its style indices
/// point into.
#[derive(Debug, Clone)]
pub struct SummarySheet {
    pub name: String,
    pub grid: Grid,
    pub styles: StyleRegistry,
}

impl SummarySheet {
    /// Row index of the totals row.
    pub fn totals_row(&self) -> u32 {
        self.grid.max_row
    }

    /// Number of columns in the table (label + items + total).
    pub fn table_width(&self) -> u32 {
        self.grid.col_count()
    }
}

/// Style indices resolved against one registry.
struct StyleIds {
    title: usize,
    header: usize,
    body: usize,
    total: usize,
}

impl StyleIds {
    fn register(styles: &SummaryStyles, registry: &mut StyleRegistry) -> Self {
        StyleIds {
            title: registry.get_or_create(styles.title.clone()),
            header: registry.get_or_create(styles.header.clone()),
            body: registry.get_or_create(styles.body.clone()),
            total: registry.get_or_create(styles.total.clone()),
        }
    }
}

/// Renders `tab` into a styled sheet.
pub fn render_summary(tab: &CrossTab, layout: &SummaryLayout, styles: &SummaryStyles) -> SummarySheet {
    let mut registry = StyleRegistry::new();
    let ids = StyleIds::register(styles, &mut registry);
    let mut grid = Grid::new();

    let item_cols = tab.column_count() as u32;
    let total_col = item_cols + 1;

    // Title
    grid.set_cell(TITLE_ROW, 0, Cell::new_text(layout.title.clone()).with_style(ids.title));
    if layout.merge_title {
        grid.merge(CellRange::new((TITLE_ROW, 0), (TITLE_ROW, total_col)));
    }

    // Header
    grid.set_cell(
        HEADER_ROW,
        0,
        Cell::new_text(layout.row_label_header.clone()).with_style(ids.header),
    );
    for (c, label) in tab.column_labels.iter().enumerate() {
        grid.set_cell(
            HEADER_ROW,
            c as u32 + 1,
            Cell::new_text(label.clone()).with_style(ids.header),
        );
    }
    grid.set_cell(
        HEADER_ROW,
        total_col,
        Cell::new_text(layout.total_label.clone()).with_style(ids.header),
    );

    // Data rows
    for (r, label) in tab.row_labels.iter().enumerate() {
        let row = FIRST_DATA_ROW + r as u32;
        grid.set_cell(row, 0, Cell::new_text(label.clone()).with_style(ids.body));
        for c in 0..tab.column_count() {
            grid.set_cell(
                row,
                c as u32 + 1,
                Cell::new_number(tab.count(r, c) as f64).with_style(ids.body),
            );
        }
        grid.set_cell(
            row,
            total_col,
            Cell::new_number(tab.row_totals[r] as f64).with_style(ids.total),
        );
    }

    // Totals row
    let totals_row = FIRST_DATA_ROW + tab.row_count() as u32;
    grid.set_cell(
        totals_row,
        0,
        Cell::new_text(layout.total_label.clone()).with_style(ids.total),
    );
    for (c, total) in tab.column_totals.iter().enumerate() {
        grid.set_cell(
            totals_row,
            c as u32 + 1,
            Cell::new_number(*total as f64).with_style(ids.total),
        );
    }
    grid.set_cell(
        totals_row,
        total_col,
        Cell::new_number(tab.grand_total as f64).with_style(ids.total),
    );

    // Column widths
    grid.set_column_width(0, layout.label_column_width);
    for col in 1..=total_col {
        grid.set_column_width(col, layout.data_column_width);
    }

    SummarySheet {
        name: layout.sheet_name.clone(),
        grid,
        styles: registry,
    }
}
