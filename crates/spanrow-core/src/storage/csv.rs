//! CSV import/export functionality

use crate::document::Sheet;
use crate::error::{Result, SpanrowError};
use spanrow_engine::engine::{CellRef, CellValue};
use std::io::Write;
use std::path::Path;

/// Parse a CSV file into cell values, starting at the given 1-based offset
pub fn parse_csv(path: &Path, start_col: usize, start_row: usize) -> Result<Vec<(CellRef, CellValue)>> {
    let content = std::fs::read_to_string(path)?;
    parse_csv_content(&content, start_col, start_row)
}

/// Parse CSV text into cell values; empty fields are skipped
pub fn parse_csv_content(
    content: &str,
    start_col: usize,
    start_row: usize,
) -> Result<Vec<(CellRef, CellValue)>> {
    let mut cells = Vec::new();

    for (row_idx, line) in content.lines().enumerate() {
        let values = parse_csv_line(line).map_err(|message| SpanrowError::Parse {
            line: row_idx + 1,
            message,
        })?;
        for (col_idx, value) in values.into_iter().enumerate() {
            if !value.is_empty() {
                cells.push((CellRef::new(start_col + col_idx, start_row + row_idx), value));
            }
        }
    }

    Ok(cells)
}

/// Body of a quoted field (opening quote already consumed) and the text
/// after its closing quote, or None if the quote is never closed.
fn take_quoted(input: &str) -> Option<(String, &str)> {
    let mut text = String::new();
    let mut chars = input.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            text.push(c);
        } else if chars.next_if(|&(_, next)| next == '"').is_some() {
            text.push('"');
        } else {
            return Some((text, &input[i + 1..]));
        }
    }
    None
}

/// Split one CSV line into typed values.
///
/// Quoted fields are kept verbatim as text; bare fields are trimmed and
/// typed with [`CellValue::from_input`].
pub(crate) fn parse_csv_line(line: &str) -> std::result::Result<Vec<CellValue>, String> {
    let mut values = Vec::new();
    let mut rest = line;

    loop {
        let tail = match rest.trim_start().strip_prefix('"') {
            Some(quoted) => {
                let (text, after) =
                    take_quoted(quoted).ok_or_else(|| "unterminated quoted field".to_string())?;
                let after = after.trim_start();
                if !after.is_empty() && !after.starts_with(',') {
                    return Err(format!("unexpected text after quoted field {:?}", text));
                }
                values.push(if text.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(text)
                });
                after.strip_prefix(',')
            }
            None => {
                let (field, tail) = match rest.split_once(',') {
                    Some((field, tail)) => (field, Some(tail)),
                    None => (rest, None),
                };
                values.push(CellValue::from_input(field.trim()));
                tail
            }
        };
        match tail {
            Some(next) => rest = next,
            None => return Ok(values),
        }
    }
}

fn escape_csv_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r'])
        || field.starts_with(' ')
        || field.ends_with(' ');
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write one sheet as CSV, covering A1 through the highest populated cell.
pub fn write_csv(out: &mut dyn Write, sheet: &Sheet) -> Result<()> {
    if sheet.cells_sorted().is_empty() {
        return Ok(());
    }
    let max_row = sheet.highest_row();
    let max_col = sheet.highest_column_index();

    for row in 1..=max_row {
        let line: Vec<String> = (1..=max_col)
            .map(|col| escape_csv_field(&sheet.get_cell_value(col, row).to_string()))
            .collect();
        writeln!(out, "{}", line.join(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_parse_csv_line_bare_fields_are_typed() {
        assert_eq!(
            parse_csv_line(" a , 2 ,TRUE,007,").unwrap(),
            vec![text("a"), CellValue::Number(2.0), CellValue::Bool(true), text("007"), CellValue::Empty]
        );
    }

    #[test]
    fn test_parse_csv_line_quoted_fields_stay_text() {
        assert_eq!(parse_csv_line("\"a,b\",c").unwrap(), vec![text("a,b"), text("c")]);
        assert_eq!(parse_csv_line("\"say \"\"hi\"\"\"").unwrap(), vec![text("say \"hi\"")]);
        assert_eq!(
            parse_csv_line(" \"  keep  \" ,\"42\",\"\"").unwrap(),
            vec![text("  keep  "), text("42"), CellValue::Empty]
        );
    }

    #[test]
    fn test_parse_csv_line_malformed_quotes() {
        assert!(parse_csv_line("\"open,b").is_err());
        assert!(parse_csv_line("\"a\"b,c").is_err());
    }

    #[test]
    fn test_parse_csv_content_offsets_and_types() {
        let cells = parse_csv_content("ID,Name\n1,\"Nick\"\n,007", 1, 1).unwrap();
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0], (CellRef::new(1, 1), CellValue::from("ID")));
        assert_eq!(cells[2], (CellRef::new(1, 2), CellValue::Number(1.0)));
        assert_eq!(cells[4], (CellRef::new(2, 3), CellValue::from("007")));
    }

    #[test]
    fn test_parse_csv_content_reports_line() {
        match parse_csv_content("a,b\nc,\"d\n", 2, 3) {
            Err(SpanrowError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("unterminated"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_write_csv_is_dense_and_escaped() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell_value(1, 1, "a,b").unwrap();
        sheet.set_cell_value(3, 2, 2).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &sheet).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"a,b\",,\n,,2\n");
    }

    #[test]
    fn test_write_csv_empty_sheet() {
        let mut out = Vec::new();
        write_csv(&mut out, &Sheet::new("Empty")).unwrap();
        assert!(out.is_empty());
    }
}
