use async_trait::async_trait;
use std::sync::Arc;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::crosswalk::TractCrosswalk;
use crate::pipeline::processing::clean::formatters::{parse_dates, rename_ward};
use crate::pipeline::processing::clean::nulls::replace_nulls;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

const NULL_SPELLINGS: &[&str] = &[""];
const TRACT_COLUMN: &str = "CENSUS_TRACT";
const WARD_COLUMN: &str = "WARD";

/// Crime incidents. Tract codes are translated when the crosswalk knows them;
/// stale codes are tolerated downstream.
pub struct CrimeCleaner {
    date_fields: Vec<String>,
    crosswalk: Arc<TractCrosswalk>,
}

impl CrimeCleaner {
    pub fn new(date_fields: Vec<String>, crosswalk: Arc<TractCrosswalk>) -> Self {
        Self {
            date_fields,
            crosswalk,
        }
    }
}

#[async_trait]
impl TableCleaner for CrimeCleaner {
    async fn clean(&self, mut row: Row, row_num: usize) -> Result<CleanOutcome, RowError> {
        replace_nulls(&mut row, NULL_SPELLINGS);
        parse_dates(&mut row, &self.date_fields, row_num);
        self.crosswalk.replace_tracts(&mut row, row_num, TRACT_COLUMN);
        rename_ward(&mut row, WARD_COLUMN);
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::Crime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::clean::crosswalk::CANONICAL_TRACT_COLUMN;

    fn cleaner() -> CrimeCleaner {
        let data = "census_tract,short\nTract 1.00,000100\n";
        let crosswalk = TractCrosswalk::from_reader(data.as_bytes(), CANONICAL_TRACT_COLUMN).unwrap();
        CrimeCleaner::new(vec!["REPORT_DAT".to_string()], Arc::new(crosswalk))
    }

    #[tokio::test]
    async fn test_crime_row() {
        let row = Row::from_pairs([
            ("REPORT_DAT", "2017-01-04T17:45:00.000Z"),
            ("CENSUS_TRACT", "000100"),
            ("WARD", "2"),
        ]);

        let outcome = cleaner().clean(row, 1).await.unwrap();
        let row = outcome.row();

        assert_eq!(row.text("REPORT_DAT"), Some("2017-01-04"));
        assert_eq!(row.text("CENSUS_TRACT"), Some("Tract 1.00"));
        assert_eq!(row.text("WARD"), Some("Ward 2"));
    }

    #[tokio::test]
    async fn test_unknown_tract_is_kept() {
        let row = Row::from_pairs([("CENSUS_TRACT", "005555"), ("WARD", "")]);

        let outcome = cleaner().clean(row, 9).await.unwrap();

        assert_eq!(outcome.row().text("CENSUS_TRACT"), Some("005555"));
        assert!(outcome.row().is_null("WARD"));
    }
}
