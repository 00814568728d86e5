use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::app::ports::CleanOutputPort;
use crate::error::Result;
use crate::metrics;
use crate::pipeline::clean::{CleanOutcome, CleanerRegistry};
use crate::types::Row;

/// Row counts for one cleaning run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub total: usize,
    pub cleaned: usize,
    pub dropped: usize,
    pub failed: usize,
}

/// Use case for cleaning every row of a source table
pub struct CleanTableUseCase {
    registry: Arc<CleanerRegistry>,
    output: Arc<dyn CleanOutputPort>,
    concurrency: usize,
}

impl CleanTableUseCase {
    pub fn new(registry: Arc<CleanerRegistry>, output: Arc<dyn CleanOutputPort>) -> Self {
        Self {
            registry,
            output,
            concurrency: 1,
        }
    }

    /// Clean up to `concurrency` rows at once; output keeps the input order
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Clean `rows` (numbered from 1) for `table`. Dropped and failed rows go
    /// to the removed output with their reason; an address service outage
    /// stops the run.
    pub async fn run<I>(&self, table: &str, rows: I) -> Result<CleanSummary>
    where
        I: IntoIterator<Item = (usize, Row)>,
    {
        let start_time = Instant::now();
        let registry = self.registry.as_ref();
        info!(table, concurrency = self.concurrency, "Starting cleaning run");

        let mut results = stream::iter(rows)
            .map(|(row_num, row)| {
                let original = row.clone();
                async move { (row_num, original, registry.clean(table, row, row_num).await) }
            })
            .buffered(self.concurrency);

        let mut summary = CleanSummary::default();
        while let Some((row_num, original, result)) = results.next().await {
            summary.total += 1;
            match result {
                Ok(CleanOutcome::Cleaned(row)) => {
                    self.output.write_cleaned(&row).await?;
                    metrics::clean::row_cleaned(table);
                    summary.cleaned += 1;
                }
                Ok(CleanOutcome::Dropped { row, reason }) => {
                    info!(table, row_num, "Row dropped: {}", reason);
                    self.output.write_removed(&row, &reason).await?;
                    metrics::clean::row_dropped(table);
                    summary.dropped += 1;
                }
                Err(e) if e.is_fatal() => {
                    error!(table, row_num, "Aborting cleaning run: {}", e);
                    metrics::clean::row_failed(table);
                    self.output.finish().await?;
                    return Err(e);
                }
                Err(e) => {
                    error!(table, row_num, "Row failed: {}", e);
                    self.output.write_removed(&original, &e.to_string()).await?;
                    metrics::clean::row_failed(table);
                    summary.failed += 1;
                }
            }
        }

        self.output.finish().await?;
        info!(
            table,
            total = summary.total,
            cleaned = summary.cleaned,
            dropped = summary.dropped,
            failed = summary.failed,
            "Cleaning run completed in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(summary)
    }
}
