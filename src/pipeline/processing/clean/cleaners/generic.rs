use async_trait::async_trait;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

/// Identity cleaner for tables whose source data needs no changes
pub struct GenericCleaner {
    kind: CleanerKind,
}

impl GenericCleaner {
    pub fn new(kind: CleanerKind) -> Self {
        Self { kind }
    }
}

impl Default for GenericCleaner {
    fn default() -> Self {
        Self::new(CleanerKind::Generic)
    }
}

#[async_trait]
impl TableCleaner for GenericCleaner {
    async fn clean(&self, row: Row, _row_num: usize) -> Result<CleanOutcome, RowError> {
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        self.kind
    }
}
