//! spanrow_engine - Spreadsheet primitives (column letters, ranges, cell values, serial dates).

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    #[test]
    fn test_range_of_letters_matches_codec() {
        let range = CellRange::new(CellRef::new(26, 1), CellRef::new(28, 3));
        assert_eq!(range.to_string(), "Z1:AB3");
        assert_eq!(range.column_letters(), vec!["Z", "AA", "AB"]);
    }

    #[test]
    fn test_date_cell_reads_back_as_formatted_text() {
        let mut cell = Cell::new(44197.5);
        cell.number_format = Some("yyyy-mm-dd hh:mm".to_string());
        assert!(cell.is_date_time());
        let ts = excel_to_timestamp(cell.value.as_number().unwrap());
        assert_eq!(format_timestamp(ts, "Y-m-d H:i"), "2021-01-01 12:00");
    }
}
