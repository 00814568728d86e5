//! Stateless field converters shared by the table cleaners.
//!
//! Every formatter treats the canonical null marker as "no value" and leaves
//! it untouched, which is why null replacement has to run first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::constants::LINE_BREAK_PLACEHOLDER;
use crate::error::RowError;
use crate::types::{FieldValue, Row};

/// Date-only layouts seen across the sources. Month precedes day whenever the
/// order is ambiguous; two-digit years are tried before four-digit ones so
/// `5/28/17` is not read as year 17.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to parse '{0}' as a date")]
pub struct DateParseError(pub String);

/// Parse a date written in any of the layouts the sources use
pub fn parse_date(value: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc().date());
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }

    Err(DateParseError(value.to_string()))
}

/// Convert a value to an ISO `YYYY-MM-DD` date. Unparsable input is logged
/// and becomes the null marker; it never fails the row.
pub fn format_date(value: &FieldValue, column: &str, row_num: usize) -> FieldValue {
    let text = match value {
        FieldValue::Null => return FieldValue::Null,
        FieldValue::Text(text) => text.as_str(),
        FieldValue::Bool(_) => {
            warn!(row_num, column, "boolean value in a date column");
            return FieldValue::Null;
        }
    };

    match parse_date(text) {
        Ok(date) => FieldValue::Text(date.format("%Y-%m-%d").to_string()),
        Err(e) => {
            warn!(row_num, column, "{}", e);
            FieldValue::Null
        }
    }
}

/// Apply `format_date` to each listed column present in the row
pub fn parse_dates(row: &mut Row, date_columns: &[String], row_num: usize) {
    for column in date_columns {
        if let Some(value) = row.get(column) {
            let formatted = format_date(value, column, row_num);
            row.set(column.as_str(), formatted);
        }
    }
}

/// Map the fixed boolean vocabulary onto a boolean. An empty string is the
/// null marker; anything else outside the vocabulary is a row-level error.
pub fn convert_boolean(field: &str, value: &FieldValue) -> Result<FieldValue, RowError> {
    let text = match value {
        FieldValue::Text(text) => text.as_str(),
        other => return Ok(other.clone()),
    };

    match text {
        "Yes" | "Y" | "TRUE" | "1" => Ok(FieldValue::Bool(true)),
        "No" | "N" | "FALSE" | "0" => Ok(FieldValue::Bool(false)),
        "" => Ok(FieldValue::Null),
        other => Err(RowError::InvalidBoolean {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Bulk loads choke on embedded line breaks, so swap them for a placeholder
pub fn remove_line_breaks(row: &mut Row) {
    for value in row.values_mut() {
        if let FieldValue::Text(text) = value {
            if text.contains(['\r', '\n']) {
                *text = text
                    .replace('\r', LINE_BREAK_PLACEHOLDER)
                    .replace('\n', LINE_BREAK_PLACEHOLDER);
            }
        }
    }
}

/// First character upper case, the rest lower case
pub fn capitalize(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrite a text column in place; absent and null columns are left as-is
fn map_text(row: &mut Row, column: &str, f: impl FnOnce(&str) -> String) {
    if let Some(text) = row.text(column) {
        let mapped = f(text);
        row.set(column, mapped);
    }
}

/// Normalize `7`, `ward 7` and `WARD 7` to `Ward 7`
pub fn rename_ward(row: &mut Row, column: &str) {
    map_text(row, column, |ward| {
        if !ward.is_empty() && ward.chars().all(char::is_numeric) {
            format!("Ward {}", ward)
        } else {
            capitalize(ward)
        }
    });
}

pub fn rename_status(row: &mut Row, column: &str) {
    map_text(row, column, capitalize);
}

pub fn rename_cluster(row: &mut Row, column: &str) {
    map_text(row, column, |cluster| format!("Cluster {}", cluster));
}

pub fn append_tract_label(row: &mut Row, column: &str) {
    map_text(row, column, |tract| format!("Tract {}", tract));
}

/// `PSA 101` from a police service area attribute such as `Police Service Area 101`
pub fn psa_label(raw: &str) -> String {
    let number = raw.split_whitespace().last().unwrap_or("");
    format!("PSA {}", number)
}
