use super::Spreadsheet;
use spanrow_core::{Document, Result, Sheet, SpanrowError};

/// Write position on the active sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    /// Last row written; the next row goes to `row + 1`
    pub row: usize,
    /// 1-based column each new row starts at
    pub column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor { row: 0, column: 1 }
    }
}

/// How [`Spreadsheet::set_sheet`] finds a sheet.
#[derive(Clone, Debug)]
pub enum SheetSelector {
    /// Position in the document; missing sheets up to it are created
    Index(usize),
    /// Existing sheet title
    Title(String),
    /// A sheet to attach to the document
    Sheet(Sheet),
}

impl From<usize> for SheetSelector {
    fn from(index: usize) -> Self {
        SheetSelector::Index(index)
    }
}

impl From<&str> for SheetSelector {
    fn from(title: &str) -> Self {
        SheetSelector::Title(title.to_string())
    }
}

impl From<String> for SheetSelector {
    fn from(title: String) -> Self {
        SheetSelector::Title(title)
    }
}

impl From<Sheet> for SheetSelector {
    fn from(sheet: Sheet) -> Self {
        SheetSelector::Sheet(sheet)
    }
}

fn no_document() -> SpanrowError {
    SpanrowError::InvalidState("no document to select a sheet from".to_string())
}

impl Spreadsheet {
    /// Forget the active sheet and move the cursor back to row 0, column 1.
    ///
    /// Key maps are left alone; selecting a sheet clears them.
    pub fn reset_sheet(&mut self) -> &mut Self {
        self.sheet_selected = false;
        self.cursor = Cursor::default();
        self
    }

    /// Select the sheet to write to, optionally renaming it.
    ///
    /// Resets the cursor and clears every key map.
    pub fn set_sheet(
        &mut self,
        sheet: impl Into<SheetSelector>,
        title: Option<&str>,
    ) -> Result<&mut Self> {
        self.reset_sheet();

        let index = match sheet.into() {
            SheetSelector::Index(index) => {
                let doc = self.document.as_mut().ok_or_else(no_document)?;
                doc.ensure_sheet_count(index.saturating_add(1));
                index
            }
            SheetSelector::Title(name) => {
                let doc = self.document.as_ref().ok_or_else(no_document)?;
                doc.sheet_index_by_title(&name)
                    .ok_or(SpanrowError::SheetNotFound(name))?
            }
            SheetSelector::Sheet(sheet) => match self.document.as_mut() {
                Some(doc) => doc.add_sheet(sheet)?,
                None => {
                    self.document = Some(Document::from_sheets(vec![sheet]));
                    0
                }
            },
        };

        let doc = self.document.as_mut().ok_or_else(no_document)?;
        let active = doc.set_active_sheet_index(index)?;
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            active.set_title(title);
        }
        tracing::debug!(index, title = active.title(), "selected sheet");

        self.sheet_selected = true;
        self.keys.clear();
        Ok(self)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Set the last written row; the next `add_row` writes to `n + 1`.
    pub fn set_row_offset(&mut self, n: usize) -> &mut Self {
        self.cursor.row = n;
        self
    }

    pub fn row_offset(&self) -> usize {
        self.cursor.row
    }

    /// Set the 1-based column rows start at. Zero is treated as 1.
    pub fn set_column_offset(&mut self, n: usize) -> &mut Self {
        if n == 0 {
            tracing::warn!("column offset 0 is not a column, using 1");
        }
        self.cursor.column = n.max(1);
        self
    }

    pub fn column_offset(&self) -> usize {
        self.cursor.column
    }
}
