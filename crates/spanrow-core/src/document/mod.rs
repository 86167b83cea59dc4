//! Workbook and worksheet model.

mod io;
mod sheet;
mod state;

pub use sheet::{ColumnDimension, Grid, Sheet};
pub use state::Document;
