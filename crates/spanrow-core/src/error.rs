//! Error types for Spanrow core.

use thiserror::Error;

/// Errors that can occur while building, reading or writing a workbook
#[derive(Error, Debug)]
pub enum SpanrowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Merge {range} overlaps existing merge {existing}")]
    MergeOverlap { range: String, existing: String },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, SpanrowError>;
