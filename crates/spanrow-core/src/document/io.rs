use super::{Document, Sheet};
use crate::error::{Result, SpanrowError};
use crate::storage::{WriterFormat, create_writer, parse_csv};
use std::io::BufWriter;
use std::path::Path;

const MAX_LOAD_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

impl Document {
    /// Load a document from a file, choosing the reader by extension.
    ///
    /// CSV files become a single sheet titled after the file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if ext != "csv" {
            return Err(SpanrowError::UnsupportedFormat(format!(
                "cannot read {}",
                path.display()
            )));
        }

        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_LOAD_FILE_BYTES {
            return Err(SpanrowError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_LOAD_FILE_BYTES
                ),
            )));
        }

        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(super::state::DEFAULT_SHEET_TITLE);
        let mut sheet = Sheet::new(title);
        for (cell_ref, value) in parse_csv(path, 1, 1)? {
            sheet.set_cell_value(cell_ref.col, cell_ref.row, value)?;
        }
        tracing::debug!(path = %path.display(), rows = sheet.highest_row(), "loaded csv");

        let mut doc = Document::from_sheets(vec![sheet]);
        doc.file_path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Write the document to a file in the given format.
    pub fn save(&self, path: &Path, format: WriterFormat) -> Result<()> {
        let writer = create_writer(self, format)?;
        let file = std::fs::File::create(path)?;
        let mut out = BufWriter::new(file);
        writer.save(&mut out)?;
        std::io::Write::flush(&mut out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanrow_engine::engine::CellValue;

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = Document::load(Path::new("book.xlsx")).unwrap_err();
        assert!(matches!(err, SpanrowError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_save_then_load_csv() {
        let dir = std::env::temp_dir().join(format!("spanrow-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("people.csv");

        let mut doc = Document::new();
        let sheet = doc.sheet_mut(0).unwrap();
        sheet.set_cell_value(1, 1, "Name").unwrap();
        sheet.set_cell_value(2, 1, "Age").unwrap();
        sheet.set_cell_value(1, 2, "Nick").unwrap();
        sheet.set_cell_value(2, 2, 30).unwrap();
        doc.save(&path, WriterFormat::Csv).unwrap();

        let loaded = Document::load(&path).unwrap();
        let sheet = loaded.sheet(0).unwrap();
        assert_eq!(sheet.title(), "people");
        assert_eq!(sheet.get_cell_value(2, 2), CellValue::Number(30.0));
        assert_eq!(loaded.file_path.as_deref(), Some(path.as_path()));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
