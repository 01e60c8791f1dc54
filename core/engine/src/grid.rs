//! FILENAME: core/engine/src/grid.rs
//! PURPOSE: Manages the collection of cells of one sheet.
//! CONTEXT: This file defines the `Grid` struct which acts as the container
//! for cell data, column widths and merged ranges. It uses a sparse storage
//! strategy (HashMap) so unfilled positions cost nothing.

use std::collections::HashMap;
use crate::cell::{Cell, CellValue};
use crate::coord::{CellCoord, CellRange};

/// The Grid struct holds the content of a sheet.
/// Row and Col are 0-based indices.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    /// Sparse storage: keys are (row, col), values are Cell instances.
    pub cells: HashMap<CellCoord, Cell>,

    /// Tracks the highest row index currently in use.
    pub max_row: u32,

    /// Tracks the highest column index currently in use.
    pub max_col: u32,

    /// Column widths in characters, keyed by column index.
    pub column_widths: HashMap<u32, f64>,

    /// Merged ranges. The value lives in the top-left cell.
    pub merged: Vec<CellRange>,
}

impl Grid {
    /// Creates a new, empty Grid.
    pub fn new() -> Self {
        Grid::default()
    }

    /// Sets a cell at the specified coordinates.
    /// Updates max_row/max_col boundaries automatically.
    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        if row > self.max_row {
            self.max_row = row;
        }
        if col > self.max_col {
            self.max_col = col;
        }
        self.cells.insert((row, col), cell);
    }

    /// Retrieves a reference to a cell at the specified coordinates.
    /// Returns None if the cell is empty (not stored).
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_count(&self) -> u32 {
        if self.cells.is_empty() { 0 } else { self.max_row + 1 }
    }

    pub fn col_count(&self) -> u32 {
        if self.cells.is_empty() { 0 } else { self.max_col + 1 }
    }

    /// The rectangle spanning every stored cell, if any.
    pub fn used_range(&self) -> Option<CellRange> {
        if self.cells.is_empty() {
            None
        } else {
            Some(CellRange::new((0, 0), (self.max_row, self.max_col)))
        }
    }

    /// Values of one row from column 0 to max_col, Empty where nothing is stored.
    pub fn row_values(&self, row: u32) -> Vec<CellValue> {
        (0..self.col_count())
            .map(|col| {
                self.get_cell(row, col)
                    .map(|c| c.value.clone())
                    .unwrap_or(CellValue::Empty)
            })
            .collect()
    }

    pub fn set_column_width(&mut self, col: u32, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    /// Registers a merged range. Ranges overlapping an existing merge and
    /// single-cell ranges are ignored; returns whether the merge was added.
    pub fn merge(&mut self, range: CellRange) -> bool {
        if range.row_count() == 1 && range.col_count() == 1 {
            return false;
        }
        let overlaps = self.merged.iter().any(|m| {
            m.start.0 <= range.end.0
                && range.start.0 <= m.end.0
                && m.start.1 <= range.end.1
                && range.start.1 <= m.end.1
        });
        if overlaps {
            return false;
        }
        self.merged.push(range);
        true
    }

    /// Returns the merged range that covers the given position.
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&CellRange> {
        self.merged.iter().find(|m| m.contains((row, col)))
    }
}
