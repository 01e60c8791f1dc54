//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the sheet model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod coord;
pub mod grid;
pub mod style;

// Re-export commonly used types at the crate root
pub use cell::{format_general_number, Cell, CellValue};
pub use coord::{coord_to_a1, index_to_col, CellCoord, CellRange};
pub use grid::Grid;
pub use style::{
    BorderStyle, BorderWeight, Borders, CellStyle, Color, FontStyle, StyleRegistry, TextAlign,
    VerticalAlign,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_cells() {
        let cell = Cell::new_number(42.0);
        assert_eq!(cell.value, CellValue::Number(42.0));
    }

    #[test]
    fn it_manages_grid() {
        let mut grid = Grid::new();
        let cell = Cell::new_text("Hello".to_string());
        grid.set_cell(0, 0, cell);

        let retrieved = grid.get_cell(0, 0);
        assert!(retrieved.is_some());
        if let Some(c) = retrieved {
            assert_eq!(c.value, CellValue::Text("Hello".to_string()));
        }
    }

    #[test]
    fn it_styles_cells_through_registry() {
        let mut registry = StyleRegistry::new();
        let bold = registry.get_or_create(CellStyle::new().with_bold(true));

        let mut grid = Grid::new();
        grid.set_cell(0, 0, Cell::new_text("Tổng".to_string()).with_style(bold));

        let stored = grid.get_cell(0, 0).unwrap();
        assert!(registry.get(stored.style_index).font.bold);
    }

    #[test]
    fn it_serializes_cells_as_json() {
        let cell = Cell::new_number(3.0).with_style(1);
        let json = serde_json::to_string(&cell).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
