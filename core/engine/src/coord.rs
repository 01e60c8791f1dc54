//! FILENAME: core/engine/src/coord.rs
//! PURPOSE: Coordinate types and A1-notation helpers.
//! CONTEXT: Internally every position is a 0-based (row, col) pair.
//! Column 0 = "A", 25 = "Z", 26 = "AA". Row 0 is row "1" in A1 notation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// Converts a 0-based (row, col) coordinate to an A1-style reference string.
/// (0, 0) -> "A1", (1, 1) -> "B2", (99, 26) -> "AA100"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row + 1)
}

/// An inclusive rectangular block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    /// Builds a range from two corners in any order.
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        CellRange {
            start: (a.0.min(b.0), a.1.min(b.1)),
            end: (a.0.max(b.0), a.1.max(b.1)),
        }
    }

    pub fn row_count(&self) -> u32 {
        self.end.0 - self.start.0 + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end.1 - self.start.1 + 1
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.0 >= self.start.0
            && coord.0 <= self.end.0
            && coord.1 >= self.start.1
            && coord.1 <= self.end.1
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", coord_to_a1(self.start), coord_to_a1(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_to_col() {
        assert_eq!(index_to_col(0), "A");
        assert_eq!(index_to_col(1), "B");
        assert_eq!(index_to_col(25), "Z");
        assert_eq!(index_to_col(26), "AA");
        assert_eq!(index_to_col(27), "AB");
        assert_eq!(index_to_col(51), "AZ");
        assert_eq!(index_to_col(52), "BA");
        assert_eq!(index_to_col(701), "ZZ");
        assert_eq!(index_to_col(702), "AAA");
    }

    #[test]
    fn test_coord_to_a1() {
        assert_eq!(coord_to_a1((0, 0)), "A1");
        assert_eq!(coord_to_a1((1, 1)), "B2");
        assert_eq!(coord_to_a1((99, 26)), "AA100");
        assert_eq!(coord_to_a1((49, 25)), "Z50");
    }

    #[test]
    fn test_range_normalizes_corners() {
        let range = CellRange::new((4, 3), (0, 0));
        assert_eq!(range.start, (0, 0));
        assert_eq!(range.end, (4, 3));
        assert_eq!(range.row_count(), 5);
        assert_eq!(range.col_count(), 4);
        assert_eq!(range.to_string(), "A1:D5");
    }

    #[test]
    fn test_range_contains() {
        let range = CellRange::new((0, 0), (0, 4));
        assert!(range.contains((0, 2)));
        assert!(!range.contains((1, 2)));
        assert!(!range.contains((0, 5)));
    }
}
