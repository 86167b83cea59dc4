//! TOML layout files describing sheets row by row.
//!
//! ```toml
//! [[sheet]]
//! title = "Contacts"
//! date_format = [{ range = "C3:C9", code = "yyyy-mm-dd" }]
//! rows = [
//!     [{ value = "Contacts", col = 3, key = "title" }],
//!     ["ID", "Name", "Joined"],
//!     [1, "Nick", 2021-01-01],
//! ]
//! ```
//!
//! A cell is a bare value or a table with `value`, `col`, `row`, `skip` and
//! `key`, mapping onto [`SpannedCell`].

use crate::builder::{CellDescriptor, CellKey, SpannedCell, Spreadsheet};
use crate::error::{LayoutError, Result};
use serde::Deserialize;
use spanrow_engine::engine::{CellValue, date_to_excel};
use std::path::Path;
use toml::Value;

const MAX_LAYOUT_FILE_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    #[serde(default, rename = "sheet")]
    pub sheets: Vec<SheetLayout>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetLayout {
    pub title: Option<String>,
    pub column_offset: Option<usize>,
    pub row_offset: Option<usize>,
    pub wrap_text: bool,
    pub auto_size: bool,
    pub date_format: Vec<DateFormat>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateFormat {
    pub range: String,
    pub code: String,
}

/// One recorded key of a built sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: CellKey,
    pub coordinate: String,
    pub column: String,
    pub row: usize,
    pub range: String,
}

/// Key maps captured for one sheet; selecting the next sheet clears them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetKeys {
    pub title: String,
    pub keys: Vec<KeyRecord>,
}

pub fn parse_layout(content: &str) -> Result<Layout> {
    Ok(toml::from_str(content)?)
}

pub fn load_layout(path: &Path) -> Result<Layout> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_LAYOUT_FILE_BYTES {
        return Err(LayoutError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "layout file too large ({} bytes, max {})",
                size, MAX_LAYOUT_FILE_BYTES
            ),
        )));
    }
    parse_layout(&std::fs::read_to_string(path)?)
}

fn scalar(value: &Value) -> std::result::Result<CellValue, String> {
    match value {
        Value::String(s) => Ok(CellValue::Text(s.clone())),
        Value::Integer(n) => Ok(CellValue::Number(*n as f64)),
        Value::Float(n) => Ok(CellValue::Number(*n)),
        Value::Boolean(b) => Ok(CellValue::Bool(*b)),
        Value::Datetime(dt) => {
            let (hour, minute, second) = dt
                .time
                .map(|t| (t.hour as u32, t.minute as u32, t.second as u32))
                .unwrap_or((0, 0, 0));
            match dt.date {
                Some(d) => date_to_excel(
                    d.year as i32,
                    d.month as u32,
                    d.day as u32,
                    hour,
                    minute,
                    second,
                )
                .map(CellValue::Number)
                .ok_or_else(|| format!("invalid date {}", dt)),
                None => Ok(CellValue::Number(
                    (hour * 3600 + minute * 60 + second) as f64 / 86_400.0,
                )),
            }
        }
        Value::Array(_) => Err("nested arrays are not cells".to_string()),
        Value::Table(_) => Err("a cell value cannot be a table".to_string()),
    }
}

fn count(table: &toml::Table, name: &str) -> std::result::Result<usize, String> {
    match table.get(name) {
        None => Ok(1),
        Some(Value::Integer(n)) if *n >= 0 => Ok(*n as usize),
        Some(other) => Err(format!("`{}` must be a non-negative integer, got {}", name, other)),
    }
}

fn descriptor(value: &Value) -> std::result::Result<CellDescriptor, String> {
    let Value::Table(table) = value else {
        return scalar(value).map(CellDescriptor::Scalar);
    };

    if let Some(unknown) = table
        .keys()
        .find(|k| !matches!(k.as_str(), "value" | "col" | "row" | "skip" | "key"))
    {
        return Err(format!("unknown cell field `{}`", unknown));
    }

    let mut cell = SpannedCell::new(match table.get("value") {
        Some(v) => scalar(v)?,
        None => CellValue::Empty,
    })
    .col_span(count(table, "col")?)
    .row_span(count(table, "row")?)
    .skip(count(table, "skip")?);

    cell = match table.get("key") {
        None => cell,
        Some(Value::String(s)) => cell.key(s.as_str()),
        Some(Value::Integer(n)) => cell.key(*n),
        Some(other) => return Err(format!("`key` must be a string or integer, got {}", other)),
    };
    Ok(cell.into())
}

fn capture_keys(book: &mut Spreadsheet) -> Result<SheetKeys> {
    let title = book.sheet()?.title().to_string();
    let keys = book
        .coordinate_map_all()
        .iter()
        .map(|(key, coordinate)| KeyRecord {
            key: key.clone(),
            coordinate: coordinate.clone(),
            column: book.column_map(key).unwrap_or_default().to_string(),
            row: book.row_map(key).unwrap_or_default(),
            range: book.range_map(key).unwrap_or_default().to_string(),
        })
        .collect();
    Ok(SheetKeys { title, keys })
}

/// Build a workbook from a layout. Returns the session (with the last sheet
/// still active) and the key maps of every sheet in order.
pub fn build(layout: &Layout) -> Result<(Spreadsheet, Vec<SheetKeys>)> {
    let mut book = Spreadsheet::create();
    let mut all_keys = Vec::with_capacity(layout.sheets.len());

    for (index, sheet) in layout.sheets.iter().enumerate() {
        book.set_sheet(index, sheet.title.as_deref())?;
        if let Some(col) = sheet.column_offset {
            book.set_column_offset(col);
        }
        if let Some(row) = sheet.row_offset {
            book.set_row_offset(row);
        }

        for (row_index, row) in sheet.rows.iter().enumerate() {
            let cells = row
                .iter()
                .map(descriptor)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|message| LayoutError::Cell {
                    sheet: index + 1,
                    row: row_index + 1,
                    message,
                })?;
            book.add_row(cells)?;
        }

        for format in &sheet.date_format {
            book.sheet_mut()?.set_number_format(&format.range, &format.code)?;
        }
        if sheet.wrap_text {
            book.set_wrap_text(None, true)?;
        }
        if sheet.auto_size {
            book.set_auto_size(None, None, true)?;
        }

        all_keys.push(capture_keys(&mut book)?);
        tracing::debug!(sheet = index, rows = sheet.rows.len(), "built sheet from layout");
    }

    Ok((book, all_keys))
}
