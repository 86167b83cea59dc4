//! Writer registry: format names, file extensions, content types.

use super::{write_csv, write_html};
use crate::document::Document;
use crate::error::{Result, SpanrowError};
use std::fmt;
use std::io::Write;

/// Content type used for format names outside the registry.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Output formats a document can be written as.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WriterFormat {
    Ods,
    Xlsx,
    Xls,
    Html,
    Csv,
}

impl WriterFormat {
    pub const ALL: [WriterFormat; 5] = [
        WriterFormat::Ods,
        WriterFormat::Xlsx,
        WriterFormat::Xls,
        WriterFormat::Html,
        WriterFormat::Csv,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WriterFormat::Ods => "Ods",
            WriterFormat::Xlsx => "Xlsx",
            WriterFormat::Xls => "Xls",
            WriterFormat::Html => "Html",
            WriterFormat::Csv => "Csv",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            WriterFormat::Ods => ".ods",
            WriterFormat::Xlsx => ".xlsx",
            WriterFormat::Xls => ".xls",
            WriterFormat::Html => ".html",
            WriterFormat::Csv => ".csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            WriterFormat::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            WriterFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            WriterFormat::Xls => "application/vnd.ms-excel",
            WriterFormat::Html => "text/html",
            WriterFormat::Csv => "text/csv",
        }
    }

    /// Look up a format by file extension, with or without the dot.
    pub fn from_extension(ext: &str) -> Option<WriterFormat> {
        let ext = ext.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|f| f.extension()[1..].eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for WriterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for WriterFormat {
    type Err = SpanrowError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SpanrowError::UnsupportedFormat(s.to_string()))
    }
}

/// Content type for a format name, falling back to `application/octet-stream`.
pub fn content_type_for(name: &str) -> &'static str {
    name.parse::<WriterFormat>()
        .map(|f| f.content_type())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Serializes a document to a byte stream.
pub trait Writer {
    fn format(&self) -> WriterFormat;

    fn save(&self, out: &mut dyn Write) -> Result<()>;
}

/// Writes one sheet (the active one unless told otherwise) as CSV.
pub struct CsvWriter<'a> {
    document: &'a Document,
    sheet_index: usize,
}

impl<'a> CsvWriter<'a> {
    pub fn new(document: &'a Document) -> Self {
        CsvWriter {
            document,
            sheet_index: document.active_sheet_index(),
        }
    }

    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet_index = index;
        self
    }
}

impl Writer for CsvWriter<'_> {
    fn format(&self) -> WriterFormat {
        WriterFormat::Csv
    }

    fn save(&self, out: &mut dyn Write) -> Result<()> {
        let sheet = self
            .document
            .sheet(self.sheet_index)
            .ok_or_else(|| SpanrowError::SheetNotFound(format!("index {}", self.sheet_index)))?;
        write_csv(out, sheet)
    }
}

/// Writes every sheet as an HTML table.
pub struct HtmlWriter<'a> {
    document: &'a Document,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(document: &'a Document) -> Self {
        HtmlWriter { document }
    }
}

impl Writer for HtmlWriter<'_> {
    fn format(&self) -> WriterFormat {
        WriterFormat::Html
    }

    fn save(&self, out: &mut dyn Write) -> Result<()> {
        write_html(out, self.document)
    }
}

/// Create a writer for a document in the given format.
///
/// Binary workbook encodings (Ods, Xlsx, Xls) have no writer here.
pub fn create_writer<'a>(document: &'a Document, format: WriterFormat) -> Result<Box<dyn Writer + 'a>> {
    match format {
        WriterFormat::Csv => Ok(Box::new(CsvWriter::new(document))),
        WriterFormat::Html => Ok(Box::new(HtmlWriter::new(document))),
        WriterFormat::Ods | WriterFormat::Xlsx | WriterFormat::Xls => Err(
            SpanrowError::UnsupportedFormat(format!("no {} writer available", format)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert_eq!("xlsx".parse::<WriterFormat>().unwrap(), WriterFormat::Xlsx);
        assert_eq!(" Csv ".parse::<WriterFormat>().unwrap(), WriterFormat::Csv);
        assert!("pdf".parse::<WriterFormat>().is_err());
        assert_eq!(WriterFormat::Ods.extension(), ".ods");
        assert_eq!(WriterFormat::from_extension(".HTML"), Some(WriterFormat::Html));
        assert_eq!(WriterFormat::from_extension("xls"), Some(WriterFormat::Xls));
        assert_eq!(WriterFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("Csv"), "text/csv");
        assert_eq!(content_type_for("Xls"), "application/vnd.ms-excel");
        assert_eq!(content_type_for("Pdf"), FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn test_create_writer() {
        let mut doc = Document::new();
        doc.sheet_mut(0).unwrap().set_cell_value(1, 1, "x").unwrap();

        let writer = create_writer(&doc, WriterFormat::Csv).unwrap();
        assert_eq!(writer.format(), WriterFormat::Csv);
        let mut out = Vec::new();
        writer.save(&mut out).unwrap();
        assert_eq!(out, b"x\n");

        assert!(matches!(
            create_writer(&doc, WriterFormat::Xlsx),
            Err(SpanrowError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_csv_writer_sheet_index() {
        let mut doc = Document::new();
        doc.create_sheet(1).set_cell_value(1, 1, "second").unwrap();
        let mut out = Vec::new();
        CsvWriter::new(&doc).with_sheet_index(1).save(&mut out).unwrap();
        assert_eq!(out, b"second\n");
        assert!(CsvWriter::new(&doc).with_sheet_index(9).save(&mut Vec::new()).is_err());
    }
}
