use async_trait::async_trait;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::formatters::{
    parse_dates, remove_line_breaks, rename_cluster, rename_ward,
};
use crate::pipeline::processing::clean::nulls::replace_nulls;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

const NULL_SPELLINGS: &[&str] = &["NONE", ""];
const CLUSTER_COLUMN: &str = "NEIGHBORHOODCLUSTER";
const WARD_COLUMN: &str = "WARD";

pub struct BuildingPermitsCleaner {
    date_fields: Vec<String>,
}

impl BuildingPermitsCleaner {
    pub fn new(date_fields: Vec<String>) -> Self {
        Self { date_fields }
    }
}

#[async_trait]
impl TableCleaner for BuildingPermitsCleaner {
    async fn clean(&self, mut row: Row, row_num: usize) -> Result<CleanOutcome, RowError> {
        replace_nulls(&mut row, NULL_SPELLINGS);
        parse_dates(&mut row, &self.date_fields, row_num);
        remove_line_breaks(&mut row);
        rename_cluster(&mut row, CLUSTER_COLUMN);
        rename_ward(&mut row, WARD_COLUMN);
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        CleanerKind::BuildingPermits
    }
}
