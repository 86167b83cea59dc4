//! Row-at-a-time workbook builder.
//!
//! A [`Spreadsheet`] owns one workbook session: the document, which sheet is
//! active, a cursor (next row to write, starting column) and the key maps
//! filled in by [`Spreadsheet::add_row`].
//!
//! ```
//! use spanrow::builder::{Spreadsheet, SpannedCell};
//!
//! let mut book = Spreadsheet::create();
//! book.add_row([SpannedCell::new("Contacts").col_span(3).key("title")])?
//!     .add_row(["ID", "Name", "Email"])?
//!     .add_row(["1", "Nick", "nick@example.com"])?;
//!
//! assert_eq!(book.range_map("title"), Some("A1:C1"));
//! assert_eq!(book.row_offset(), 3);
//! # Ok::<(), spanrow_core::SpanrowError>(())
//! ```

mod cursor;
mod keymap;
mod range;
mod reader;
mod row;

pub use cursor::{Cursor, SheetSelector};
pub use keymap::CellKey;
pub use reader::{DEFAULT_TIMESTAMP_FORMAT, ReadOptions, ReadValue};
pub use row::{CellDescriptor, SpannedCell};

use keymap::KeyMaps;
use spanrow_core::storage::{WriterFormat, create_writer};
use spanrow_core::{Document, Result, Sheet, SpanrowError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builder state for one workbook session.
#[derive(Debug, Default)]
pub struct Spreadsheet {
    document: Option<Document>,
    /// Whether the document's active sheet has been selected for writing
    sheet_selected: bool,
    cursor: Cursor,
    keys: KeyMaps,
}

impl Spreadsheet {
    /// A session with no document; most operations fail until one is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session around a fresh document with one empty sheet.
    pub fn create() -> Self {
        Self::with_document(Document::new())
    }

    pub fn with_document(document: Document) -> Self {
        Spreadsheet {
            document: Some(document),
            ..Self::default()
        }
    }

    /// A session around a document loaded from disk.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::with_document(Document::load(path)?))
    }

    /// Replace the document. The cursor and key maps are reset.
    pub fn set_document(&mut self, document: Document) -> &mut Self {
        self.document = Some(document);
        self.reset_sheet();
        self.keys.clear();
        self
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    pub fn into_document(self) -> Option<Document> {
        self.document
    }

    fn require_document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| SpanrowError::InvalidState("no document is set".to_string()))
    }

    /// Index of the sheet being written, selecting sheet 0 if none is active yet.
    pub(crate) fn ensure_active_sheet(&mut self) -> Result<usize> {
        if !self.sheet_selected {
            if self.document.is_none() {
                return Err(SpanrowError::InvalidState(
                    "no document or sheet is set".to_string(),
                ));
            }
            self.set_sheet(0, None)?;
        }
        self.require_document().map(|doc| doc.active_sheet_index())
    }

    /// The active sheet, selecting sheet 0 if none is active yet.
    pub fn sheet(&mut self) -> Result<&Sheet> {
        let index = self.ensure_active_sheet()?;
        self.require_document()?
            .sheet(index)
            .ok_or_else(|| SpanrowError::SheetNotFound(format!("index {}", index)))
    }

    /// Mutable access to the active sheet, selecting sheet 0 if none is active yet.
    pub fn sheet_mut(&mut self) -> Result<&mut Sheet> {
        let index = self.ensure_active_sheet()?;
        self.document
            .as_mut()
            .and_then(|doc| doc.sheet_mut(index))
            .ok_or_else(|| SpanrowError::SheetNotFound(format!("index {}", index)))
    }

    /// Serialize the document to a byte stream.
    pub fn write_to(&self, out: &mut dyn Write, format: WriterFormat) -> Result<()> {
        let writer = create_writer(self.require_document()?, format)?;
        writer.save(out)
    }

    /// Write the document to `dir/<filename><extension>` and return the path.
    pub fn save(&self, dir: &Path, filename: &str, format: WriterFormat) -> Result<PathBuf> {
        let doc = self.require_document()?;
        let path = dir.join(format!("{}{}", filename, format.extension()));
        doc.save(&path, format)?;
        tracing::debug!(path = %path.display(), %format, "saved document");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_no_document() {
        let mut book = Spreadsheet::new();
        assert!(book.document().is_none());
        assert!(matches!(book.sheet(), Err(SpanrowError::InvalidState(_))));
        assert!(matches!(
            book.write_to(&mut Vec::new(), WriterFormat::Csv),
            Err(SpanrowError::InvalidState(_))
        ));
    }

    #[test]
    fn test_sheet_defaults_to_first() {
        let mut book = Spreadsheet::create();
        assert_eq!(book.sheet().unwrap().title(), "Worksheet");
        assert_eq!(book.cursor(), Cursor { row: 0, column: 1 });
    }

    #[test]
    fn test_set_document_resets_session() {
        let mut book = Spreadsheet::create();
        book.add_row([SpannedCell::new("x").key("k")]).unwrap();
        book.set_document(Document::new());
        assert_eq!(book.row_offset(), 0);
        assert!(book.coordinate_map_all().is_empty());
    }

    #[test]
    fn test_write_to_csv() {
        let mut book = Spreadsheet::create();
        book.add_rows([vec!["a", "b"], vec!["c", "d"]]).unwrap();
        let mut out = Vec::new();
        book.write_to(&mut out, WriterFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b\nc,d\n");
    }

    #[test]
    fn test_save_appends_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = Spreadsheet::create();
        book.add_row(["only"]).unwrap();
        let path = book.save(dir.path(), "report", WriterFormat::Html).unwrap();
        assert_eq!(path, dir.path().join("report.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("<td>only</td>"));
    }
}
