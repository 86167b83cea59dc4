use super::Spreadsheet;
use serde::Deserialize;
use spanrow_core::{CellValue, Result, SpanrowError};
use spanrow_engine::engine::{
    MAX_COLUMN, MAX_ROW, excel_to_timestamp, format_number, format_timestamp,
};
use std::fmt;

/// Pattern used for date cells when none is configured.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "Y-m-d H:i:s";

/// Options for [`Spreadsheet::get_rows`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadOptions {
    /// Last row to read; None (or 0) reads to the highest populated row
    pub row: Option<usize>,
    /// Last column to read; None (or 0) reads to the highest populated column
    pub column: Option<usize>,
    /// Convert date-formatted cells to Unix timestamps
    pub timestamp: bool,
    /// `date()`-style pattern for converted dates; None or "" keeps raw seconds
    pub timestamp_format: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            row: None,
            column: None,
            timestamp: true,
            timestamp_format: Some(DEFAULT_TIMESTAMP_FORMAT.to_string()),
        }
    }
}

/// A value read back from a sheet.
#[derive(Clone, Debug, PartialEq)]
pub enum ReadValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Unix seconds converted from a date cell
    Timestamp(i64),
}

impl From<CellValue> for ReadValue {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => ReadValue::Empty,
            CellValue::Text(s) => ReadValue::Text(s),
            CellValue::Number(n) => ReadValue::Number(n),
            CellValue::Bool(b) => ReadValue::Bool(b),
        }
    }
}

impl fmt::Display for ReadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadValue::Empty => Ok(()),
            ReadValue::Text(s) => f.write_str(s),
            ReadValue::Number(n) => f.write_str(&format_number(*n)),
            ReadValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            ReadValue::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

/// A read bound override: None or 0 means auto, past `max` is an error.
fn bound(value: Option<usize>, max: usize, axis: &str) -> Result<Option<usize>> {
    match value.filter(|n| *n > 0) {
        Some(n) if n > max => Err(SpanrowError::InvalidRange(format!(
            "last {} {} is beyond the sheet limit {}",
            axis, n, max
        ))),
        other => Ok(other),
    }
}

impl Spreadsheet {
    /// Read the active sheet from A1 into a dense grid, rows outer.
    ///
    /// With `to_string`, every value (including empties) comes back as text.
    pub fn get_rows(&mut self, to_string: bool, options: &ReadOptions) -> Result<Vec<Vec<ReadValue>>> {
        let sheet = self.sheet()?;
        let last_row = bound(options.row, MAX_ROW, "row")?.unwrap_or_else(|| sheet.highest_row());
        let last_col = bound(options.column, MAX_COLUMN, "column")?
            .unwrap_or_else(|| sheet.highest_column_index());
        let pattern = options.timestamp_format.as_deref().filter(|p| !p.is_empty());

        let mut rows = Vec::with_capacity(last_row);
        for row in 1..=last_row {
            let mut values = Vec::with_capacity(last_col);
            for col in 1..=last_col {
                let raw = sheet.get_cell_value(col, row);
                let mut value = match raw.as_number() {
                    Some(serial) if options.timestamp && sheet.is_date_time(col, row) => {
                        let ts = excel_to_timestamp(serial);
                        match pattern {
                            Some(p) => ReadValue::Text(format_timestamp(ts, p)),
                            None => ReadValue::Timestamp(ts),
                        }
                    }
                    _ => ReadValue::from(raw),
                };
                if to_string {
                    value = ReadValue::Text(value.to_string());
                }
                values.push(value);
            }
            rows.push(values);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_date() -> Spreadsheet {
        let mut book = Spreadsheet::create();
        book.add_row([CellValue::Number(44197.5), CellValue::from("x")]).unwrap();
        book.add_row([CellValue::Bool(true)]).unwrap();
        book.sheet_mut()
            .unwrap()
            .set_number_format("A1", "yyyy-mm-dd hh:mm")
            .unwrap();
        book
    }

    #[test]
    fn test_date_cell_formatted() {
        let mut book = book_with_date();
        let options = ReadOptions {
            timestamp_format: Some("Y-m-d".to_string()),
            ..ReadOptions::default()
        };
        let rows = book.get_rows(false, &options).unwrap();
        assert_eq!(rows[0][0], ReadValue::Text("2021-01-01".to_string()));
        assert_eq!(rows[0][1], ReadValue::Text("x".to_string()));
        assert_eq!(rows[1][0], ReadValue::Bool(true));
        assert_eq!(rows[1][1], ReadValue::Empty);
    }

    #[test]
    fn test_date_cell_raw_timestamp() {
        let mut book = book_with_date();
        let options = ReadOptions {
            timestamp_format: None,
            ..ReadOptions::default()
        };
        let rows = book.get_rows(false, &options).unwrap();
        assert_eq!(rows[0][0], ReadValue::Timestamp(1_609_502_400));
    }

    #[test]
    fn test_timestamp_disabled_keeps_serial() {
        let mut book = book_with_date();
        let options = ReadOptions {
            timestamp: false,
            ..ReadOptions::default()
        };
        let rows = book.get_rows(true, &options).unwrap();
        assert_eq!(rows[0][0], ReadValue::Text("44197.5".to_string()));
        assert_eq!(rows[1][0], ReadValue::Text("TRUE".to_string()));
        assert_eq!(rows[1][1], ReadValue::Text(String::new()));
    }

    #[test]
    fn test_default_options_format_full_datetime() {
        let mut book = book_with_date();
        let rows = book.get_rows(true, &ReadOptions::default()).unwrap();
        assert_eq!(rows[0][0].to_string(), "2021-01-01 12:00:00");
    }

    #[test]
    fn test_bounds_override_is_dense() {
        let mut book = book_with_date();
        let options = ReadOptions {
            row: Some(3),
            column: Some(1),
            ..ReadOptions::default()
        };
        let rows = book.get_rows(false, &options).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 1));
        assert_eq!(rows[2][0], ReadValue::Empty);
    }

    #[test]
    fn test_bounds_beyond_sheet_limits_rejected() {
        let mut book = book_with_date();
        for options in [
            ReadOptions {
                row: Some(usize::MAX),
                ..ReadOptions::default()
            },
            ReadOptions {
                row: Some(MAX_ROW + 1),
                ..ReadOptions::default()
            },
            ReadOptions {
                column: Some(MAX_COLUMN + 1),
                ..ReadOptions::default()
            },
        ] {
            assert!(matches!(
                book.get_rows(true, &options),
                Err(SpanrowError::InvalidRange(_))
            ));
        }

        let options = ReadOptions {
            row: Some(1),
            column: Some(MAX_COLUMN),
            ..ReadOptions::default()
        };
        let rows = book.get_rows(false, &options).unwrap();
        assert_eq!(rows[0].len(), MAX_COLUMN);
    }

    #[test]
    fn test_get_rows_without_document() {
        let mut book = Spreadsheet::new();
        assert!(matches!(
            book.get_rows(true, &ReadOptions::default()),
            Err(SpanrowError::InvalidState(_))
        ));
    }
}
