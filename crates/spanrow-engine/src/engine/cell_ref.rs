//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and 1-based column/row coordinates, plus the
//! bijective base-26 column codec they are built on.
//!
//! # Examples
//!
//! ```
//! use spanrow_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 2);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Highest column index a sheet accepts (`XFD`).
pub const MAX_COLUMN: usize = 16_384;
/// Highest row number a sheet accepts.
pub const MAX_ROW: usize = 1_048_576;

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\$?(?<letters>[A-Za-z]+)\$?(?<numbers>[0-9]+)$").expect("valid A1 regex")
    })
}

/// Convert a 1-based column index to spreadsheet letters (1 -> A, 26 -> Z, 27 -> AA).
///
/// Index 0 has no letter form and yields an empty string.
pub fn number_to_letters(n: usize) -> String {
    let mut letters = Vec::new();
    let mut n = n;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert spreadsheet letters to a 1-based column index (A -> 1, AA -> 27).
///
/// Lowercase letters are accepted. Returns None for empty input, non-letters,
/// or a value that overflows `usize`.
pub fn letters_to_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc)
}

/// A reference to a cell by 1-based column and row.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "B2", "$AA$10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name.trim())?;
        let col = letters_to_number(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?;
        if row == 0 {
            return None;
        }
        Some(CellRef::new(col, row))
    }

    /// Column letters of this reference.
    pub fn column_letters(&self) -> String {
        number_to_letters(self.col)
    }

    /// Whether the reference lies inside the sheet limits.
    pub fn in_bounds(&self) -> bool {
        (1..=MAX_COLUMN).contains(&self.col) && (1..=MAX_ROW).contains(&self.row)
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", number_to_letters(self.col), self.row)
    }
}
