use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::crosswalk::TractFilter;
use crate::pipeline::processing::clean::nulls::replace_nulls;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::{FieldValue, Row};

/// ACS suppression and annotation markers
const NULL_SPELLINGS: &[&str] = &["N", "**", "***", "****", "*****", "(X)", "-", ""];
const TRACT_COLUMN: &str = "census_tract";
const MEDIAN_RENT_COLUMN: &str = "HD01_VD01";

static CODED_RENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\d,]+)[+-]$").expect("coded rent pattern is valid"));

/// American Community Survey tables. Rows are keyed by the full tract GEOID
/// and anything outside the jurisdiction is dropped.
pub struct CensusCleaner {
    jurisdiction: Arc<TractFilter>,
}

impl CensusCleaner {
    pub fn new(jurisdiction: Arc<TractFilter>) -> Self {
        Self { jurisdiction }
    }
}

#[async_trait]
impl TableCleaner for CensusCleaner {
    async fn clean(&self, mut row: Row, _row_num: usize) -> Result<CleanOutcome, RowError> {
        let geoid = match (row.text("state"), row.text("county"), row.text("tract")) {
            (Some(state), Some(county), Some(tract)) => FieldValue::Text(format!("{}{}{}", state, county, tract)),
            _ => FieldValue::Null,
        };
        row.set(TRACT_COLUMN, geoid);

        // Suppression markers are lost here; only the value survives.
        replace_nulls(&mut row, NULL_SPELLINGS);
        strip_coded_rent(&mut row, MEDIAN_RENT_COLUMN);

        if !self.jurisdiction.contains(&row, TRACT_COLUMN) {
            let reason = format!(
                "census tract {} is outside the jurisdiction",
                row.get(TRACT_COLUMN).map(ToString::to_string).unwrap_or_default()
            );
            return Ok(CleanOutcome::dropped(row, reason));
        }

        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::Census
    }
}

/// Rents above the top reportable value arrive as `3,500+` and below the
/// bottom one as `100-`; keep the bound as the value.
pub fn strip_coded_rent(row: &mut Row, column: &str) {
    let Some(bound) = row
        .text(column)
        .and_then(|rent| CODED_RENT.captures(rent))
        .map(|caps| caps[1].replace(',', ""))
    else {
        return;
    };
    row.set(column, bound);
}
