use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::nulls::replace_nulls;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

const MODIFIED_COLUMN: &str = "GIS_LAST_MOD_DTTM";

/// Housing authority property extract; its modification stamp is exported
/// as epoch milliseconds.
pub struct DcHousingCleaner;

#[async_trait]
impl TableCleaner for DcHousingCleaner {
    async fn clean(&self, mut row: Row, _row_num: usize) -> Result<CleanOutcome, RowError> {
        replace_nulls(&mut row, &[""]);

        if let Some(stamp) = row.text(MODIFIED_COLUMN) {
            let formatted = epoch_millis_to_date(stamp)?;
            row.set(MODIFIED_COLUMN, formatted);
        }

        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::DcHousing
    }
}

/// `1483228800000` to `01/01/2017`, evaluated in UTC
pub fn epoch_millis_to_date(stamp: &str) -> Result<String, RowError> {
    let invalid = |reason: &str| RowError::InvalidValue {
        field: MODIFIED_COLUMN.to_string(),
        value: stamp.to_string(),
        reason: reason.to_string(),
    };

    let millis: i64 = stamp
        .trim()
        .parse()
        .map_err(|_| invalid("not an integer millisecond timestamp"))?;
    let datetime = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| invalid("timestamp out of range"))?;

    Ok(datetime.format("%m/%d/%Y").to_string())
}
