//! spanrow-core - In-memory workbook model, format registry and writers.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{ColumnDimension, Document, Sheet};
pub use error::{Result, SpanrowError};
pub use storage::{Writer, WriterFormat, create_writer};

pub use spanrow_engine::engine::{Cell, CellRange, CellRef, CellValue};
