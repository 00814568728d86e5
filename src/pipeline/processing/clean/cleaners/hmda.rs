use async_trait::async_trait;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::formatters::{append_tract_label, parse_dates};
use crate::pipeline::processing::clean::nulls::replace_nulls;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

const TRACT_COLUMN: &str = "census_tract_number";

/// Home Mortgage Disclosure Act loan records
pub struct HmdaCleaner {
    date_fields: Vec<String>,
}

impl HmdaCleaner {
    pub fn new(date_fields: Vec<String>) -> Self {
        Self { date_fields }
    }
}

#[async_trait]
impl TableCleaner for HmdaCleaner {
    async fn clean(&self, mut row: Row, row_num: usize) -> Result<CleanOutcome, RowError> {
        replace_nulls(&mut row, &[""]);
        parse_dates(&mut row, &self.date_fields, row_num);
        append_tract_label(&mut row, TRACT_COLUMN);
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::Hmda
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tract_number_is_labelled() {
        let cleaner = HmdaCleaner::new(Vec::new());
        let row = Row::from_pairs([("census_tract_number", "47.02"), ("loan_amount", "")]);

        let outcome = cleaner.clean(row, 1).await.unwrap();

        assert_eq!(outcome.row().text("census_tract_number"), Some("Tract 47.02"));
        assert!(outcome.row().is_null("loan_amount"));
    }
}
