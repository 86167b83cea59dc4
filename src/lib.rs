//! spanrow - Row-at-a-time spreadsheet builder with merged spans and keyed cell lookup.

pub mod builder;
pub mod config;
pub mod error;
pub mod layout;

pub use builder::{
    CellDescriptor, CellKey, Cursor, ReadOptions, ReadValue, SheetSelector, SpannedCell,
    Spreadsheet,
};
pub use error::LayoutError;
pub use spanrow_core::{Document, Sheet, SpanrowError, WriterFormat};
pub use spanrow_engine::engine::{CellValue, letters_to_number, number_to_letters};
