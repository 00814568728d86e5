use async_trait::async_trait;
use std::sync::Arc;

use crate::app::ports::AddressLookupPort;
use crate::error::RowError;
use crate::pipeline::processing::clean::crosswalk::{TractCrosswalk, TractFilter};
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

/// Result of cleaning one row
#[derive(Debug, Clone, PartialEq)]
pub enum CleanOutcome {
    /// The row is ready to load
    Cleaned(Row),
    /// The row is excluded on purpose; not an error
    Dropped { row: Row, reason: String },
}

impl CleanOutcome {
    pub fn dropped(row: Row, reason: impl Into<String>) -> Self {
        CleanOutcome::Dropped {
            row,
            reason: reason.into(),
        }
    }

    pub fn row(&self) -> &Row {
        match self {
            CleanOutcome::Cleaned(row) | CleanOutcome::Dropped { row, .. } => row,
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, CleanOutcome::Dropped { .. })
    }
}

/// A table-specific cleaning strategy. Stage order is fixed per table and
/// each row passes through exactly once.
#[async_trait]
pub trait TableCleaner: Send + Sync {
    async fn clean(&self, row: Row, row_num: usize) -> Result<CleanOutcome, RowError>;

    fn kind(&self) -> CleanerKind;
}

/// Shared, read-only collaborators handed to every cleaner at construction
#[derive(Clone)]
pub struct CleanerContext {
    pub crosswalk: Arc<TractCrosswalk>,
    pub jurisdiction: Arc<TractFilter>,
    /// Address service; only cleaners that resolve addresses require it
    pub lookup: Option<Arc<dyn AddressLookupPort>>,
}

impl CleanerContext {
    pub fn new(crosswalk: TractCrosswalk) -> Self {
        Self {
            crosswalk: Arc::new(crosswalk),
            jurisdiction: Arc::new(TractFilter::district_of_columbia()),
            lookup: None,
        }
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn AddressLookupPort>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: TractFilter) -> Self {
        self.jurisdiction = Arc::new(jurisdiction);
        self
    }
}
