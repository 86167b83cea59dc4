use crate::error::{Result, SpanrowError};
use dashmap::DashMap;
use spanrow_engine::engine::{
    Cell, CellRange, CellRef, CellValue, letters_to_number, number_to_letters,
};
use std::collections::BTreeMap;

/// Refuse styling operations that would materialize more cells than this.
const MAX_STYLE_RANGE_CELLS: usize = 1_000_000;

/// Sparse cell storage keyed by 1-based coordinate.
pub type Grid = DashMap<CellRef, Cell>;

/// Width and sizing settings for one column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnDimension {
    pub auto_size: bool,
    /// Width in character units; None leaves the default width.
    pub width: Option<f64>,
}

impl ColumnDimension {
    pub fn set_auto_size(&mut self, auto_size: bool) -> &mut Self {
        self.auto_size = auto_size;
        self
    }

    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = Some(width);
        self
    }
}

/// A single worksheet: a sparse grid plus merged ranges and column settings.
#[derive(Clone, Debug)]
pub struct Sheet {
    title: String,
    grid: Grid,
    merges: Vec<CellRange>,
    columns: BTreeMap<usize, ColumnDimension>,
}

fn checked_cell(col: usize, row: usize) -> Result<CellRef> {
    let cell_ref = CellRef::new(col, row);
    if cell_ref.in_bounds() {
        Ok(cell_ref)
    } else {
        Err(SpanrowError::InvalidCoordinate(format!(
            "column {} row {} is outside the sheet",
            col, row
        )))
    }
}

fn checked_range(range: &str) -> Result<CellRange> {
    let parsed =
        CellRange::parse(range).ok_or_else(|| SpanrowError::InvalidRange(range.to_string()))?;
    if !parsed.start.in_bounds() || !parsed.end.in_bounds() {
        return Err(SpanrowError::InvalidRange(format!(
            "{} is outside the sheet",
            range
        )));
    }
    Ok(parsed)
}

impl Sheet {
    pub fn new(title: impl Into<String>) -> Sheet {
        Sheet {
            title: title.into(),
            grid: Grid::new(),
            merges: Vec::new(),
            columns: BTreeMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    /// Write a value at a 1-based column and row.
    pub fn set_cell_value(&mut self, col: usize, row: usize, value: impl Into<CellValue>) -> Result<()> {
        let cell_ref = checked_cell(col, row)?;
        self.grid.entry(cell_ref).or_default().value = value.into();
        Ok(())
    }

    /// Write a value at an A1 coordinate.
    pub fn set_cell_value_at(&mut self, coordinate: &str, value: impl Into<CellValue>) -> Result<()> {
        let cell_ref = CellRef::from_str(coordinate)
            .ok_or_else(|| SpanrowError::InvalidCoordinate(coordinate.to_string()))?;
        self.set_cell_value(cell_ref.col, cell_ref.row, value)
    }

    /// Read the value at a 1-based column and row; missing cells read as Empty.
    pub fn get_cell_value(&self, col: usize, row: usize) -> CellValue {
        self.grid
            .get(&CellRef::new(col, row))
            .map(|cell| cell.value.clone())
            .unwrap_or_default()
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        self.grid.get(&CellRef::new(col, row)).map(|cell| cell.clone())
    }

    pub fn cell_exists(&self, col: usize, row: usize) -> bool {
        self.grid.contains_key(&CellRef::new(col, row))
    }

    pub fn is_date_time(&self, col: usize, row: usize) -> bool {
        self.grid
            .get(&CellRef::new(col, row))
            .is_some_and(|cell| cell.is_date_time())
    }

    /// All populated cells in row-major order.
    pub fn cells_sorted(&self) -> Vec<(CellRef, Cell)> {
        let mut cells: Vec<(CellRef, Cell)> = self
            .grid
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        cells.sort_by(|a, b| a.0.row.cmp(&b.0.row).then(a.0.col.cmp(&b.0.col)));
        cells
    }

    /// Highest row holding a cell (1 for an empty sheet).
    pub fn highest_row(&self) -> usize {
        self.grid.iter().map(|entry| entry.key().row).max().unwrap_or(1)
    }

    /// Highest column index holding a cell (1 for an empty sheet).
    pub fn highest_column_index(&self) -> usize {
        self.grid.iter().map(|entry| entry.key().col).max().unwrap_or(1)
    }

    /// Letters of the highest column holding a cell ("A" for an empty sheet).
    pub fn highest_column(&self) -> String {
        number_to_letters(self.highest_column_index())
    }

    /// Mark a rectangular range as merged.
    ///
    /// The top-left cell keeps its value; other existing cells in the range
    /// are blanked. Re-merging an identical range is a no-op.
    pub fn merge_cells(&mut self, range: &str) -> Result<CellRange> {
        let merged = checked_range(range)?;
        if merged.is_single_cell() {
            return Err(SpanrowError::InvalidRange(format!(
                "merge needs more than one cell: {}",
                range
            )));
        }
        if self.merges.contains(&merged) {
            return Ok(merged);
        }
        if let Some(existing) = self.merges.iter().find(|m| m.intersects(&merged)) {
            return Err(SpanrowError::MergeOverlap {
                range: merged.to_string(),
                existing: existing.to_string(),
            });
        }

        self.grid.entry(merged.start).or_default();
        for cell_ref in merged.cells().skip(1) {
            if let Some(mut cell) = self.grid.get_mut(&cell_ref) {
                cell.value = CellValue::Empty;
            }
        }
        tracing::debug!(sheet = %self.title, range = %merged, "merged cells");
        self.merges.push(merged);
        Ok(merged)
    }

    pub fn merged_ranges(&self) -> &[CellRange] {
        &self.merges
    }

    /// The merge covering a cell, if any.
    pub fn merge_at(&self, cell_ref: &CellRef) -> Option<&CellRange> {
        self.merges.iter().find(|m| m.contains(cell_ref))
    }

    fn style_range(&mut self, range: &str, apply: impl Fn(&mut Cell)) -> Result<CellRange> {
        let target = checked_range(range)?;
        let count = target.width().checked_mul(target.height());
        if count.is_none_or(|n| n > MAX_STYLE_RANGE_CELLS) {
            return Err(SpanrowError::InvalidRange(format!(
                "{} covers too many cells to style",
                range
            )));
        }
        for cell_ref in target.cells() {
            apply(&mut self.grid.entry(cell_ref).or_default());
        }
        Ok(target)
    }

    /// Set the wrap-text flag on every cell in a range.
    pub fn set_wrap_text(&mut self, range: &str, wrap: bool) -> Result<()> {
        self.style_range(range, |cell| cell.style.wrap_text = wrap)?;
        Ok(())
    }

    /// Set the number format code on every cell in a range.
    pub fn set_number_format(&mut self, range: &str, code: &str) -> Result<()> {
        let format = if code.eq_ignore_ascii_case("general") {
            None
        } else {
            Some(code.to_string())
        };
        self.style_range(range, |cell| cell.number_format = format.clone())?;
        Ok(())
    }

    pub fn column_dimension(&self, letters: &str) -> Option<&ColumnDimension> {
        letters_to_number(letters).and_then(|col| self.columns.get(&col))
    }

    /// Settings for a column, created on first access.
    pub fn column_dimension_mut(&mut self, letters: &str) -> Result<&mut ColumnDimension> {
        let col = letters_to_number(letters)
            .filter(|col| CellRef::new(*col, 1).in_bounds())
            .ok_or_else(|| SpanrowError::InvalidCoordinate(format!("column {}", letters)))?;
        Ok(self.columns.entry(col).or_default())
    }

    /// Column settings by 1-based index, in column order.
    pub fn column_dimensions(&self) -> impl Iterator<Item = (usize, &ColumnDimension)> {
        self.columns.iter().map(|(col, dim)| (*col, dim))
    }
}
