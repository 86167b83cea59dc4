//! Error types for layout files and the CLI

use spanrow_core::SpanrowError;
use thiserror::Error;

/// Errors that can occur while reading a layout file and building from it
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid cell in sheet {sheet}, row {row}: {message}")]
    Cell {
        sheet: usize,
        row: usize,
        message: String,
    },

    #[error(transparent)]
    Build(#[from] SpanrowError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
