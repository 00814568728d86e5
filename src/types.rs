use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::NULL_MARKER;

/// A single cell value after it has entered the cleaning pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// The canonical null marker every recognized null spelling collapses to
    Null,
    /// A genuine string value
    Text(String),
    /// Output of the boolean formatter
    Bool(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The string content of a text value; `None` for null and booleans
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "{}", NULL_MARKER),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Bool(true) => write!(f, "True"),
            FieldValue::Bool(false) => write!(f, "False"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One source record, keyed by column name, in source column order.
///
/// Rows are small (tens of columns), so lookups scan the field list rather
/// than maintaining a separate index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from raw reader output; every cell starts out as text
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Row::new();
        for (key, value) in pairs {
            row.set(key, FieldValue::Text(value.into()));
        }
        row
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut FieldValue> {
        self.fields.iter_mut().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    /// Text content of a column, `None` when absent, null or boolean
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(FieldValue::as_text)
    }

    /// True when the column is absent or holds the null marker
    pub fn is_null(&self, column: &str) -> bool {
        self.get(column).map_or(true, FieldValue::is_null)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Overwrite a column in place, appending it when the row lacks it
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        let column = column.into();
        let value = value.into();
        match self.get_mut(&column) {
            Some(slot) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut FieldValue> {
        self.fields.iter_mut().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_preserves_column_order() {
        let mut row = Row::from_pairs([("b", "2"), ("a", "1")]);
        row.set("b", FieldValue::Null);
        row.set("c", "3");

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["b", "a", "c"]);
        assert!(row.is_null("b"));
        assert_eq!(row.text("c"), Some("3"));
    }

    #[test]
    fn test_display_renders_null_marker_and_booleans() {
        assert_eq!(FieldValue::Null.to_string(), "Null");
        assert_eq!(FieldValue::Bool(true).to_string(), "True");
        assert_eq!(FieldValue::Bool(false).to_string(), "False");
        assert_eq!(FieldValue::text("x").to_string(), "x");
    }

    #[test]
    fn test_absent_column_reads_as_null() {
        let row = Row::new();
        assert!(row.is_null("missing"));
        assert!(!row.contains("missing"));
    }
}
