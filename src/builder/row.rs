use super::Spreadsheet;
use super::keymap::{CellKey, KeyEntry};
use spanrow_core::{CellRange, CellRef, CellValue, Result, SpanrowError};
use spanrow_engine::engine::{MAX_COLUMN, MAX_ROW, number_to_letters};

/// One entry of a row passed to [`Spreadsheet::add_row`].
#[derive(Clone, Debug, PartialEq)]
pub enum CellDescriptor {
    /// A bare value occupying one column
    Scalar(CellValue),
    /// A value with span, skip and key options
    Spanned(SpannedCell),
}

/// A cell with layout options.
///
/// `col_span`/`row_span` merge the cell over that many columns/rows, `skip`
/// is how many columns the cursor advances afterwards (on top of any merge),
/// and `key` records where the cell landed for later lookup. Zero counts are
/// treated as 1.
#[derive(Clone, Debug, PartialEq)]
pub struct SpannedCell {
    pub value: CellValue,
    pub col_span: usize,
    pub row_span: usize,
    pub skip: usize,
    pub key: Option<CellKey>,
}

impl Default for SpannedCell {
    fn default() -> Self {
        SpannedCell {
            value: CellValue::Empty,
            col_span: 1,
            row_span: 1,
            skip: 1,
            key: None,
        }
    }
}

impl SpannedCell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        SpannedCell {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn col_span(mut self, n: usize) -> Self {
        self.col_span = n;
        self
    }

    pub fn row_span(mut self, n: usize) -> Self {
        self.row_span = n;
        self
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    pub fn key(mut self, key: impl Into<CellKey>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl From<SpannedCell> for CellDescriptor {
    fn from(cell: SpannedCell) -> Self {
        CellDescriptor::Spanned(cell)
    }
}

impl From<CellValue> for CellDescriptor {
    fn from(value: CellValue) -> Self {
        CellDescriptor::Scalar(value)
    }
}

macro_rules! impl_scalar_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellDescriptor {
                fn from(value: $t) -> Self {
                    CellDescriptor::Scalar(CellValue::from(value))
                }
            }
        )*
    };
}

impl_scalar_from!(&str, String, &String, f64, bool, i32, i64, u32, u64, usize);

/// Last index covered by `count` positions starting at `start`, if it stays within `max`.
fn last_index(start: usize, count: usize, max: usize, axis: &str) -> Result<usize> {
    start
        .checked_add(count - 1)
        .filter(|end| *end <= max)
        .ok_or_else(|| {
            SpanrowError::InvalidCoordinate(format!("{} {} plus {} is out of range", axis, start, count))
        })
}

fn coordinate(col: usize, row: usize) -> String {
    CellRef::new(col, row).to_string()
}

impl Spreadsheet {
    /// Write the next row on the active sheet.
    ///
    /// The row goes to `row_offset + 1`, starting at the column offset.
    /// Scalars take one column each; spanned cells merge, skip and record
    /// their key as they go. Cells already written stay written if a later
    /// one fails.
    pub fn add_row<I>(&mut self, cells: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<CellDescriptor>,
    {
        let index = self.ensure_active_sheet()?;
        let Spreadsheet {
            document,
            cursor,
            keys,
            ..
        } = &mut *self;
        let sheet = document
            .as_mut()
            .and_then(|doc| doc.sheet_mut(index))
            .ok_or_else(|| SpanrowError::SheetNotFound(format!("index {}", index)))?;

        let mut col = cursor.column;
        let row = cursor
            .row
            .checked_add(1)
            .filter(|r| *r <= MAX_ROW)
            .ok_or_else(|| SpanrowError::InvalidCoordinate(format!("row {}", cursor.row)))?;
        cursor.row = row;

        for descriptor in cells {
            match descriptor.into() {
                CellDescriptor::Scalar(value) => {
                    sheet.set_cell_value(col, row, value)?;
                    col += 1;
                }
                CellDescriptor::Spanned(cell) => {
                    let col_span = cell.col_span.max(1);
                    let row_span = cell.row_span.max(1);
                    let skip = cell.skip.max(1);
                    let end_col = last_index(col, col_span, MAX_COLUMN, "column")?;
                    let end_row = last_index(row, row_span, MAX_ROW, "row")?;
                    // the cursor may come to rest one past the last column
                    let next_col = end_col
                        .checked_add(skip)
                        .filter(|c| *c <= MAX_COLUMN + 1)
                        .ok_or_else(|| {
                            SpanrowError::InvalidCoordinate(format!("skip {} from column {}", skip, end_col))
                        })?;

                    sheet.set_cell_value(col, row, cell.value)?;

                    // (start column, range) of a merge made for this cell
                    let mut merged: Option<(usize, String)> = None;
                    if col_span > 1 || row_span > 1 {
                        let start_col = col;
                        let range = CellRange::new(
                            CellRef::new(start_col, row),
                            CellRef::new(end_col, end_row),
                        )
                        .to_string();
                        sheet.merge_cells(&range)?;
                        col = end_col;
                        merged = Some((start_col, range));
                    }

                    if let Some(key) = cell.key {
                        let entry = match merged {
                            Some((start_col, range)) => KeyEntry {
                                coordinate: coordinate(start_col, row),
                                column: number_to_letters(start_col),
                                row,
                                range,
                            },
                            None => {
                                let start = coordinate(col, row);
                                let range = if skip > 1 {
                                    format!("{}:{}", start, coordinate(next_col - 1, row))
                                } else {
                                    format!("{}:{}", start, start)
                                };
                                KeyEntry {
                                    coordinate: start,
                                    column: number_to_letters(col),
                                    row,
                                    range,
                                }
                            }
                        };
                        keys.record(key, entry);
                    }

                    col = next_col;
                }
            }
        }

        tracing::debug!(row, end_column = col, "added row");
        Ok(self)
    }

    /// Write several rows in order. The first failing row stops the batch.
    pub fn add_rows<R, I>(&mut self, rows: R) -> Result<&mut Self>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator,
        I::Item: Into<CellDescriptor>,
    {
        for cells in rows {
            self.add_row(cells)?;
        }
        Ok(self)
    }
}
