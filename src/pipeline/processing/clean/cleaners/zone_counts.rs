use async_trait::async_trait;
use std::sync::Arc;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::crosswalk::TractCrosswalk;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

const ZONE_TYPE_COLUMN: &str = "zone_type";
const ZONE_COLUMN: &str = "zone";

/// Housing unit counts by bedroom and zone. Only tract zones are translated.
pub struct ZoneCountsCleaner {
    crosswalk: Arc<TractCrosswalk>,
}

impl ZoneCountsCleaner {
    pub fn new(crosswalk: Arc<TractCrosswalk>) -> Self {
        Self { crosswalk }
    }
}

#[async_trait]
impl TableCleaner for ZoneCountsCleaner {
    async fn clean(&self, mut row: Row, _row_num: usize) -> Result<CleanOutcome, RowError> {
        if row.text(ZONE_TYPE_COLUMN) == Some("census_tract") {
            self.crosswalk.rename_census_tract(&mut row, ZONE_COLUMN)?;
        }
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::ZoneHousingUnitBedrmCount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::clean::crosswalk::CANONICAL_TRACT_COLUMN;

    fn cleaner() -> ZoneCountsCleaner {
        let data = "census_tract,short\nTract 2.01,000201\n";
        ZoneCountsCleaner::new(Arc::new(
            TractCrosswalk::from_reader(data.as_bytes(), CANONICAL_TRACT_COLUMN).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_tract_zone_is_canonicalized() {
        let row = Row::from_pairs([("zone_type", "census_tract"), ("zone", "000201")]);

        let outcome = cleaner().clean(row, 1).await.unwrap();

        assert_eq!(outcome.row().text("zone"), Some("Tract 2.01"));
    }

    #[tokio::test]
    async fn test_other_zone_types_untouched() {
        let row = Row::from_pairs([("zone_type", "ward"), ("zone", "Ward 1")]);

        let outcome = cleaner().clean(row, 1).await.unwrap();

        assert_eq!(outcome.row().text("zone"), Some("Ward 1"));
    }
}
