use super::sheet::Sheet;
use crate::error::{Result, SpanrowError};
use std::collections::HashSet;
use std::path::PathBuf;

/// Title given to the first sheet of a fresh document.
pub(crate) const DEFAULT_SHEET_TITLE: &str = "Worksheet";

/// An in-memory workbook: an ordered list of sheets, one of them active.
#[derive(Clone, Debug)]
pub struct Document {
    sheets: Vec<Sheet>,
    active: usize,
    /// File the document was loaded from, if any
    pub file_path: Option<PathBuf>,
}

impl Document {
    /// Create a document with a single empty sheet.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Document {
            sheets: vec![Sheet::new(DEFAULT_SHEET_TITLE)],
            active: 0,
            file_path: None,
        }
    }

    /// Build a document from existing sheets. An empty list yields [`Document::new`].
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        if sheets.is_empty() {
            return Self::new();
        }
        Document {
            sheets,
            active: 0,
            file_path: None,
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn sheet_index_by_title(&self, title: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.title() == title)
    }

    fn unique_title(&self) -> String {
        let mut n = self.sheets.len();
        loop {
            let candidate = format!("{}{}", DEFAULT_SHEET_TITLE, n);
            if self.sheet_index_by_title(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Insert a new empty sheet at `index` (clamped to the end) and return it.
    pub fn create_sheet(&mut self, index: usize) -> &mut Sheet {
        let index = index.min(self.sheets.len());
        let sheet = Sheet::new(self.unique_title());
        self.sheets.insert(index, sheet);
        if self.sheets.len() > 1 && self.active >= index {
            self.active += 1;
        }
        tracing::debug!(index, count = self.sheets.len(), "created sheet");
        &mut self.sheets[index]
    }

    /// Append empty sheets until the document holds `count` of them.
    ///
    /// Titles are chosen in one pass over the existing ones.
    pub fn ensure_sheet_count(&mut self, count: usize) {
        if self.sheets.len() >= count {
            return;
        }
        let taken: HashSet<String> = self.sheets.iter().map(|s| s.title().to_string()).collect();
        let mut n = self.sheets.len();
        while self.sheets.len() < count {
            let title = format!("{}{}", DEFAULT_SHEET_TITLE, n);
            n += 1;
            if !taken.contains(&title) {
                self.sheets.push(Sheet::new(title));
            }
        }
        tracing::debug!(count, "appended sheets");
    }

    /// Append a sheet. Titles must be unique within the document.
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<usize> {
        if self.sheet_index_by_title(sheet.title()).is_some() {
            return Err(SpanrowError::InvalidState(format!(
                "document already contains a sheet named {:?}",
                sheet.title()
            )));
        }
        self.sheets.push(sheet);
        Ok(self.sheets.len() - 1)
    }

    pub fn active_sheet_index(&self) -> usize {
        self.active
    }

    pub fn active_sheet(&self) -> &Sheet {
        &self.sheets[self.active]
    }

    /// Make the sheet at `index` active and return it.
    pub fn set_active_sheet_index(&mut self, index: usize) -> Result<&mut Sheet> {
        if index >= self.sheets.len() {
            return Err(SpanrowError::SheetNotFound(format!(
                "index {} (document has {} sheets)",
                index,
                self.sheets.len()
            )));
        }
        self.active = index;
        Ok(&mut self.sheets[index])
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
