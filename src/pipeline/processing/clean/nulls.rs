use crate::types::{FieldValue, Row};

/// Null spellings used by most tables
pub const DEFAULT_NULL_SPELLINGS: &[&str] = &["NA", "-", "+", ""];

/// Replace every value that matches one of `spellings` with the canonical
/// null marker. Values already holding the marker are left alone, so running
/// this twice is the same as running it once.
pub fn replace_nulls(row: &mut Row, spellings: &[&str]) {
    for value in row.values_mut() {
        let is_null_spelling = value
            .as_text()
            .map_or(false, |text| spellings.contains(&text));
        if is_null_spelling {
            *value = FieldValue::Null;
        }
    }
}

/// Null out a single column when it holds `sentinel`
pub fn null_if(row: &mut Row, column: &str, sentinel: &str) {
    if row.text(column) == Some(sentinel) {
        row.set(column, FieldValue::Null);
    }
}
