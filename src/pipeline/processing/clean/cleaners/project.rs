use async_trait::async_trait;
use std::sync::Arc;

use super::base::{CleanOutcome, TableCleaner};
use crate::app::ports::AddressLookupPort;
use crate::constants::{DEFAULT_CITY, DEFAULT_STATE};
use crate::error::RowError;
use crate::pipeline::processing::clean::address::{AddressColumns, AddressResolver};
use crate::pipeline::processing::clean::backfill::{default_if_null, GeoColumns, GeocodeBackfill};
use crate::pipeline::processing::clean::crosswalk::TractCrosswalk;
use crate::pipeline::processing::clean::formatters::{parse_dates, rename_status, rename_ward};
use crate::pipeline::processing::clean::nulls::replace_nulls;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

const NULL_SPELLINGS: &[&str] = &["N", ""];

const CITY_COLUMN: &str = "Proj_City";
const STATE_COLUMN: &str = "Proj_ST";

/// Preservation catalog projects: the one table whose rows are resolved to a
/// canonical address and backfilled with geography.
pub struct ProjectCleaner {
    date_fields: Vec<String>,
    resolver: AddressResolver,
    backfill: GeocodeBackfill,
    crosswalk: Arc<TractCrosswalk>,
    geo: GeoColumns,
}

impl ProjectCleaner {
    pub fn new(
        date_fields: Vec<String>,
        lookup: Arc<dyn AddressLookupPort>,
        crosswalk: Arc<TractCrosswalk>,
    ) -> Self {
        Self {
            date_fields,
            resolver: AddressResolver::new(lookup.clone(), AddressColumns::project()),
            backfill: GeocodeBackfill::new(lookup, GeoColumns::project()),
            crosswalk,
            geo: GeoColumns::project(),
        }
    }
}

#[async_trait]
impl TableCleaner for ProjectCleaner {
    async fn clean(&self, mut row: Row, row_num: usize) -> Result<CleanOutcome, RowError> {
        replace_nulls(&mut row, NULL_SPELLINGS);
        parse_dates(&mut row, &self.date_fields, row_num);

        self.resolver.add_resolved_id(&mut row, row_num).await?;
        self.geo.ensure_columns(&mut row);
        default_if_null(&mut row, CITY_COLUMN, DEFAULT_CITY);
        default_if_null(&mut row, STATE_COLUMN, DEFAULT_STATE);
        self.backfill.backfill(&mut row, row_num).await?;

        rename_ward(&mut row, &self.geo.ward);
        rename_status(&mut row, &self.geo.status);
        self.crosswalk.rename_census_tract(&mut row, &self.geo.census_tract)?;

        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::Project
    }
}
