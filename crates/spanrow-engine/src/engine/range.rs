//! Rectangular cell ranges (`"A1:C4"`).
//!
//! A range string always renders as `start:end`, even for a single cell.
//! Parsing accepts either corner order and a bare coordinate (`"B2"`), and
//! normalizes so that `start` is the top-left corner.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::{CellRef, number_to_letters};

/// A rectangular block of cells, inclusive on both corners.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Build a range from two corners in any order.
    pub fn new(a: CellRef, b: CellRef) -> CellRange {
        CellRange {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    pub fn single(cell: CellRef) -> CellRange {
        CellRange {
            start: cell,
            end: cell,
        }
    }

    /// Parse `"A1:B2"` or `"A1"`. Returns None if either corner is invalid.
    pub fn parse(range: &str) -> Option<CellRange> {
        let parts: Vec<&str> = range.split(':').collect();
        match parts.as_slice() {
            [single] => CellRef::from_str(single).map(CellRange::single),
            [start, end] => {
                let start = CellRef::from_str(start)?;
                let end = CellRef::from_str(end)?;
                Some(CellRange::new(start, end))
            }
            _ => None,
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    pub fn width(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    pub fn height(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        (self.start.col..=self.end.col).contains(&cell.col)
            && (self.start.row..=self.end.row).contains(&cell.row)
    }

    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start.col <= other.end.col
            && other.start.col <= self.end.col
            && self.start.row <= other.end.row
            && other.start.row <= self.end.row
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |row| (self.start.col..=self.end.col).map(move |col| CellRef::new(col, row)))
    }

    /// Column letters covered by the range, left to right.
    pub fn column_letters(&self) -> Vec<String> {
        (self.start.col..=self.end.col).map(number_to_letters).collect()
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl std::str::FromStr for CellRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRange::parse(s).ok_or_else(|| format!("Invalid range: {}", s))
    }
}
