use super::Spreadsheet;
use spanrow_core::{Result, SpanrowError};
use spanrow_engine::engine::{MAX_COLUMN, letters_to_number, number_to_letters};

fn column_index(letters: &str) -> Result<usize> {
    letters_to_number(letters)
        .ok_or_else(|| SpanrowError::InvalidCoordinate(format!("column {}", letters)))
}

fn check_column(col: usize) -> Result<usize> {
    if (1..=MAX_COLUMN).contains(&col) {
        Ok(col)
    } else {
        Err(SpanrowError::InvalidCoordinate(format!(
            "column {} is outside A..{}",
            number_to_letters(col),
            number_to_letters(MAX_COLUMN)
        )))
    }
}

impl Spreadsheet {
    /// Range from the column offset in row 1 to the highest populated cell.
    pub fn get_range_all(&mut self) -> Result<String> {
        self.ensure_active_sheet()?;
        let start = number_to_letters(self.cursor.column);
        let sheet = self.sheet()?;
        Ok(format!(
            "{}1:{}{}",
            start,
            sheet.highest_column(),
            sheet.highest_row()
        ))
    }

    /// Set wrap-text on a range, or on [`Spreadsheet::get_range_all`] when None.
    pub fn set_wrap_text(&mut self, range: Option<&str>, value: bool) -> Result<&mut Self> {
        let range = match range.filter(|r| !r.is_empty()) {
            Some(r) => r.to_string(),
            None => self.get_range_all()?,
        };
        self.sheet_mut()?.set_wrap_text(&range, value)?;
        Ok(self)
    }

    /// Set auto-size on every column from `start` (default: the column
    /// offset) to `end` (default: the highest populated column), inclusive.
    pub fn set_auto_size(
        &mut self,
        start: Option<&str>,
        end: Option<&str>,
        value: bool,
    ) -> Result<&mut Self> {
        self.ensure_active_sheet()?;
        let first = match start.filter(|s| !s.is_empty()) {
            Some(letters) => column_index(letters)?,
            None => self.cursor.column,
        };
        let sheet = self.sheet_mut()?;
        let last = match end.filter(|s| !s.is_empty()) {
            Some(letters) => column_index(letters)?,
            None => sheet.highest_column_index(),
        };

        let (first, last) = (check_column(first)?, check_column(last)?);

        for col in first.min(last)..=first.max(last) {
            sheet
                .column_dimension_mut(&number_to_letters(col))?
                .set_auto_size(value);
        }
        Ok(self)
    }
}
