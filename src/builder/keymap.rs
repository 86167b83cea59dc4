use super::Spreadsheet;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Caller-chosen name for a cell written by `add_row`.
///
/// Integer and string keys share one namespace: `7` and `"7"` are the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(String);

impl CellKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CellKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellKey {
    fn from(key: &str) -> Self {
        CellKey(key.to_string())
    }
}

impl From<String> for CellKey {
    fn from(key: String) -> Self {
        CellKey(key)
    }
}

impl From<&CellKey> for CellKey {
    fn from(key: &CellKey) -> Self {
        key.clone()
    }
}

macro_rules! impl_key_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellKey {
                fn from(key: $t) -> Self {
                    CellKey(key.to_string())
                }
            }
        )*
    };
}

impl_key_from_int!(i32, i64, u32, u64, usize);

/// Where a keyed cell landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct KeyEntry {
    pub coordinate: String,
    pub column: String,
    pub row: usize,
    pub range: String,
}

/// Key -> location lookups for the active sheet.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyMaps {
    coordinates: BTreeMap<CellKey, String>,
    columns: BTreeMap<CellKey, String>,
    rows: BTreeMap<CellKey, usize>,
    ranges: BTreeMap<CellKey, String>,
}

impl KeyMaps {
    pub fn record(&mut self, key: CellKey, entry: KeyEntry) {
        self.coordinates.insert(key.clone(), entry.coordinate);
        self.columns.insert(key.clone(), entry.column);
        self.rows.insert(key.clone(), entry.row);
        self.ranges.insert(key, entry.range);
    }

    pub fn clear(&mut self) {
        self.coordinates.clear();
        self.columns.clear();
        self.rows.clear();
        self.ranges.clear();
    }
}

impl Spreadsheet {
    /// Top-left coordinate (e.g. "B3") recorded for a key.
    pub fn coordinate_map(&self, key: impl Into<CellKey>) -> Option<&str> {
        self.keys.coordinates.get(&key.into()).map(String::as_str)
    }

    pub fn coordinate_map_all(&self) -> &BTreeMap<CellKey, String> {
        &self.keys.coordinates
    }

    /// Column letters recorded for a key.
    pub fn column_map(&self, key: impl Into<CellKey>) -> Option<&str> {
        self.keys.columns.get(&key.into()).map(String::as_str)
    }

    pub fn column_map_all(&self) -> &BTreeMap<CellKey, String> {
        &self.keys.columns
    }

    /// Row number recorded for a key.
    pub fn row_map(&self, key: impl Into<CellKey>) -> Option<usize> {
        self.keys.rows.get(&key.into()).copied()
    }

    pub fn row_map_all(&self) -> &BTreeMap<CellKey, usize> {
        &self.keys.rows
    }

    /// Range (e.g. "A1:C1") covering a keyed cell's span or skip footprint.
    pub fn range_map(&self, key: impl Into<CellKey>) -> Option<&str> {
        self.keys.ranges.get(&key.into()).map(String::as_str)
    }

    pub fn range_map_all(&self) -> &BTreeMap<CellKey, String> {
        &self.keys.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_string_keys_coincide() {
        assert_eq!(CellKey::from(7), CellKey::from("7"));
        assert_eq!(CellKey::from(7usize).as_str(), "7");
    }

    #[test]
    fn test_record_and_clear() {
        let mut maps = KeyMaps::default();
        maps.record(
            CellKey::from("k"),
            KeyEntry {
                coordinate: "B2".to_string(),
                column: "B".to_string(),
                row: 2,
                range: "B2:B2".to_string(),
            },
        );
        assert_eq!(maps.rows.get("k"), Some(&2));
        assert_eq!(maps.ranges.get("k").map(String::as_str), Some("B2:B2"));
        maps.clear();
        assert!(maps.coordinates.is_empty());
        assert!(maps.columns.is_empty());
    }

    #[test]
    fn test_unknown_key_is_none() {
        let book = Spreadsheet::create();
        assert_eq!(book.coordinate_map("nope"), None);
        assert_eq!(book.column_map(3), None);
        assert_eq!(book.row_map("nope"), None);
        assert_eq!(book.range_map("nope"), None);
    }
}
