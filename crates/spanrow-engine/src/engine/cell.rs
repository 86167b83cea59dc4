//! Cell data structures for a worksheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellValue`] - The raw value stored in a cell (empty, text, number, or boolean)
//! - [`CellStyle`] - The subset of styling a sheet tracks per cell
//! - [`Cell`] - A value with its number format and style

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::is_date_time_format;
use super::format::format_number;

/// The raw value stored in a cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse loosely typed input (e.g. a CSV field).
    /// - Empty string -> Empty
    /// - TRUE/FALSE (any case) -> Bool
    /// - Valid number without leading zeros (so "007" stays text) -> Number
    /// - Otherwise -> Text
    pub fn from_input(input: &str) -> CellValue {
        if input.is_empty() {
            return CellValue::Empty;
        }
        if input.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if input.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }

        let trimmed = input.trim();
        if trimmed != input {
            return CellValue::Text(input.to_string());
        }
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if digits.starts_with('0')
            && digits.len() > 1
            && digits.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            return CellValue::Text(trimmed.to_string());
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
        CellValue::Text(trimmed.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::Text(s.clone())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellValue {
                fn from(n: $t) -> Self {
                    CellValue::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64, usize);

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Per-cell style flags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub wrap_text: bool,
}

/// A cell in a worksheet grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    /// Number format code (e.g. `yyyy-mm-dd`); None means General.
    pub number_format: Option<String>,
    pub style: CellStyle,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Cell {
        Cell {
            value: value.into(),
            ..Cell::default()
        }
    }

    pub fn new_empty() -> Cell {
        Cell::default()
    }

    /// True when the cell holds a number displayed through a date/time format.
    pub fn is_date_time(&self) -> bool {
        matches!(self.value, CellValue::Number(_))
            && self.number_format.as_deref().is_some_and(is_date_time_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from("hi").to_string(), "hi");
        assert_eq!(CellValue::from(42).to_string(), "42");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from(true).to_string(), "TRUE");
    }

    #[test]
    fn test_from_input() {
        assert_eq!(CellValue::from_input(""), CellValue::Empty);
        assert_eq!(CellValue::from_input("12"), CellValue::Number(12.0));
        assert_eq!(CellValue::from_input("-3.5"), CellValue::Number(-3.5));
        assert_eq!(CellValue::from_input("007"), CellValue::Text("007".into()));
        assert_eq!(CellValue::from_input("0.5"), CellValue::Number(0.5));
        assert_eq!(CellValue::from_input("True"), CellValue::Bool(true));
        assert_eq!(CellValue::from_input("  pad  "), CellValue::Text("  pad  ".into()));
        assert_eq!(CellValue::from_input("inf"), CellValue::Text("inf".into()));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(CellValue::from(None::<&str>), CellValue::Empty);
        assert_eq!(CellValue::from(Some(3)), CellValue::Number(3.0));
    }

    #[test]
    fn test_is_date_time_requires_number_and_date_format() {
        let mut cell = Cell::new(45000.0);
        assert!(!cell.is_date_time());
        cell.number_format = Some("yyyy-mm-dd".to_string());
        assert!(cell.is_date_time());
        cell.value = CellValue::from("2023-03-15");
        assert!(!cell.is_date_time());
    }
}
