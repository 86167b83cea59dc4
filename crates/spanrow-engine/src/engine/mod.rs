//! Spreadsheet primitives.
//!
//! This module provides the building blocks the document model and the
//! builder share:
//!
//! - [`CellRef`], [`number_to_letters`], [`letters_to_number`] - A1 notation and
//!   the bijective base-26 column codec
//! - [`CellRange`] - Rectangular ranges rendered as `start:end`
//! - [`Cell`], [`CellValue`], [`CellStyle`] - Cell storage types
//! - [`excel_to_timestamp`], [`format_timestamp`] - Serial date conversion
//! - [`format_number`] - Number to text rendering

mod cell;
mod cell_ref;
mod date;
mod format;
mod range;

pub use cell::{Cell, CellStyle, CellValue};
pub use cell_ref::{CellRef, MAX_COLUMN, MAX_ROW, letters_to_number, number_to_letters};
pub use date::{
    date_to_excel, excel_to_timestamp, format_timestamp, is_date_time_format, timestamp_to_excel,
};
pub use format::format_number;
pub use range::CellRange;
