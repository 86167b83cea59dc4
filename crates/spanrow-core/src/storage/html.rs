//! HTML export functionality

use crate::document::{Document, Sheet};
use crate::error::Result;
use spanrow_engine::engine::CellRef;
use std::io::Write;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Write every sheet of the document as an HTML table
pub fn write_html(out: &mut dyn Write, doc: &Document) -> Result<()> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>")?;
    writeln!(out, "<head><meta charset=\"utf-8\"></head>")?;
    writeln!(out, "<body>")?;
    for sheet in doc.sheets() {
        write_sheet_table(out, sheet)?;
    }
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

fn write_sheet_table(out: &mut dyn Write, sheet: &Sheet) -> Result<()> {
    let max_row = sheet.highest_row();
    let max_col = sheet.highest_column_index();

    writeln!(out, "<table data-sheet=\"{}\">", escape_html(sheet.title()))?;

    // Column widths, only when any column has settings
    if sheet.column_dimensions().next().is_some() {
        writeln!(out, "<colgroup>")?;
        for col in 1..=max_col {
            let letters = spanrow_engine::engine::number_to_letters(col);
            match sheet.column_dimension(&letters).and_then(|d| d.width) {
                Some(width) => writeln!(out, "<col style=\"width:{}ch\">", width)?,
                None => writeln!(out, "<col>")?,
            }
        }
        writeln!(out, "</colgroup>")?;
    }

    for row in 1..=max_row {
        write!(out, "<tr>")?;
        for col in 1..=max_col {
            let cell_ref = CellRef::new(col, row);
            let merge = sheet.merge_at(&cell_ref);
            if merge.is_some_and(|m| m.start != cell_ref) {
                // Covered by a merge anchored elsewhere
                continue;
            }

            let mut attrs = String::new();
            if let Some(m) = merge {
                if m.width() > 1 {
                    attrs.push_str(&format!(" colspan=\"{}\"", m.width()));
                }
                if m.height() > 1 {
                    attrs.push_str(&format!(" rowspan=\"{}\"", m.height()));
                }
            }
            if sheet.cell(col, row).is_some_and(|c| c.style.wrap_text) {
                attrs.push_str(" style=\"white-space:pre-wrap\"");
            }

            let value = sheet.get_cell_value(col, row).to_string();
            write!(out, "<td{}>{}</td>", attrs, escape_html(&value))?;
        }
        writeln!(out, "</tr>")?;
    }

    writeln!(out, "</table>")?;
    Ok(())
}
