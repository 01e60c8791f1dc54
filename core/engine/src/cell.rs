//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the data structures for a single output cell.
//! CONTEXT: A summary sheet only ever holds literal values (labels and counts),
//! so a cell is just a value plus an index into the shared StyleRegistry.

use serde::{Deserialize, Serialize};

/// Represents the raw data within a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

/// The atomic unit of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub style_index: usize,
}

impl Cell {
    pub fn new() -> Self {
        Cell {
            value: CellValue::Empty,
            style_index: 0,
        }
    }

    pub fn new_number(num: f64) -> Self {
        Cell {
            value: CellValue::Number(num),
            style_index: 0,
        }
    }

    pub fn new_text(text: String) -> Self {
        Cell {
            value: CellValue::Text(text),
            style_index: 0,
        }
    }

    pub fn new_boolean(value: bool) -> Self {
        Cell {
            value: CellValue::Boolean(value),
            style_index: 0,
        }
    }

    /// Attach a style from the registry to this cell.
    pub fn with_style(mut self, style_index: usize) -> Self {
        self.style_index = style_index;
        self
    }

    /// Returns the display value of the cell as a String.
    pub fn display_value(&self) -> String {
        self.value.display()
    }
}

impl CellValue {
    /// Text form of the value, as a spreadsheet would show it with the
    /// General number format.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_general_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Format without unnecessary decimal places.
pub fn format_general_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_integral_number() {
        assert_eq!(Cell::new_number(42.0).display_value(), "42");
        assert_eq!(Cell::new_number(-3.0).display_value(), "-3");
    }

    #[test]
    fn test_display_fractional_number() {
        assert_eq!(Cell::new_number(2.5).display_value(), "2.5");
    }

    #[test]
    fn test_display_boolean_and_empty() {
        assert_eq!(Cell::new_boolean(true).display_value(), "TRUE");
        assert_eq!(Cell::new().display_value(), "");
    }

    #[test]
    fn test_with_style() {
        let cell = Cell::new_text("Tổng".to_string()).with_style(3);
        assert_eq!(cell.style_index, 3);
        assert_eq!(cell.value, CellValue::Text("Tổng".to_string()));
    }
}
