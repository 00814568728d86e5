use async_trait::async_trait;
use tracing::warn;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::formatters::{convert_boolean, parse_dates};
use crate::pipeline::processing::clean::nulls::{null_if, replace_nulls};
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::{FieldValue, Row};

const NULL_SPELLINGS: &[&str] = &["N", ""];
const ACTIVE_COLUMN: &str = "Subsidy_Active";
const POA_END_COLUMN: &str = "POA_end_actual";

/// Subsidy records. A `Subsidy_Active` value outside the boolean vocabulary
/// means the subsidy state is unknown, so the row is dropped rather than
/// loaded with a guess.
pub struct SubsidyCleaner {
    date_fields: Vec<String>,
}

impl SubsidyCleaner {
    pub fn new(date_fields: Vec<String>) -> Self {
        Self { date_fields }
    }
}

#[async_trait]
impl TableCleaner for SubsidyCleaner {
    async fn clean(&self, mut row: Row, row_num: usize) -> Result<CleanOutcome, RowError> {
        let active = row.get(ACTIVE_COLUMN).cloned().unwrap_or(FieldValue::Null);
        match convert_boolean(ACTIVE_COLUMN, &active) {
            Ok(value) => row.set(ACTIVE_COLUMN, value),
            Err(e) => {
                warn!(row_num, "dropping subsidy row: {}", e);
                return Ok(CleanOutcome::dropped(row, e.to_string()));
            }
        }

        null_if(&mut row, POA_END_COLUMN, "U");
        replace_nulls(&mut row, NULL_SPELLINGS);
        parse_dates(&mut row, &self.date_fields, row_num);
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::Subsidy
    }
}
