use async_trait::async_trait;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::formatters::{capitalize, convert_boolean, parse_dates};
use crate::pipeline::processing::clean::nulls::{null_if, replace_nulls};
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::{FieldValue, Row};

const NULL_SPELLINGS: &[&str] = &["", "\\"];
const CITY_STATE_ZIP_COLUMN: &str = "OWNER_ADDRESS_CITYSTZIP";
const VACANT_COLUMN: &str = "VACANT_USE";

/// Tax assessment records. An unrecognized `VACANT_USE` value fails the row.
pub struct DcTaxCleaner {
    date_fields: Vec<String>,
}

impl DcTaxCleaner {
    pub fn new(date_fields: Vec<String>) -> Self {
        Self { date_fields }
    }
}

#[async_trait]
impl TableCleaner for DcTaxCleaner {
    async fn clean(&self, mut row: Row, row_num: usize) -> Result<CleanOutcome, RowError> {
        replace_nulls(&mut row, NULL_SPELLINGS);
        // A lone comma is what an empty city/state/zip concatenation leaves behind
        null_if(&mut row, CITY_STATE_ZIP_COLUMN, ",");

        if let Some(vacant) = row.get(VACANT_COLUMN) {
            let normalized = match vacant {
                FieldValue::Text(text) => FieldValue::Text(capitalize(text)),
                other => other.clone(),
            };
            let converted = convert_boolean(VACANT_COLUMN, &normalized)?;
            row.set(VACANT_COLUMN, converted);
        }

        parse_dates(&mut row, &self.date_fields, row_num);
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::DcTax
    }
}
