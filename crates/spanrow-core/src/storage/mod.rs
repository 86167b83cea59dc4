//! Import/export of documents.

mod csv;
mod html;
mod writer;

pub use csv::{parse_csv, parse_csv_content, write_csv};
pub use html::write_html;
pub use writer::{
    CsvWriter, FALLBACK_CONTENT_TYPE, HtmlWriter, Writer, WriterFormat, content_type_for,
    create_writer,
};
