//! Address resolution and backfill metrics

use crate::metrics::stage_metric;

/// An address was resolved; `strategy` names the evidence used
pub fn resolved(strategy: &'static str) {
    ::metrics::counter!(stage_metric!(counter, "geocode", "resolved"), "strategy" => strategy).increment(1);
}

pub fn unresolved() {
    ::metrics::counter!(stage_metric!(counter, "geocode", "unresolved")).increment(1);
}

pub fn backfill_lookup() {
    ::metrics::counter!(stage_metric!(counter, "geocode", "backfill_lookups")).increment(1);
}

pub fn fields_backfilled(count: usize) {
    ::metrics::histogram!(stage_metric!(histogram, "geocode", "fields_backfilled")).record(count as f64);
}

/// A lookup attempt failed and will be retried
pub fn lookup_retry(operation: &'static str) {
    ::metrics::counter!(stage_metric!(counter, "geocode", "lookup_retries"), "operation" => operation).increment(1);
}

pub(crate) fn register() {
    ::metrics::describe_counter!(stage_metric!(counter, "geocode", "resolved"), "Rows matched to a canonical address");
    ::metrics::describe_counter!(stage_metric!(counter, "geocode", "unresolved"), "Rows left without an address match");
    ::metrics::describe_counter!(stage_metric!(counter, "geocode", "backfill_lookups"), "Address lookups made to fill geographic gaps");
    ::metrics::describe_histogram!(stage_metric!(histogram, "geocode", "fields_backfilled"), "Columns filled per backfilled row");
    ::metrics::describe_counter!(stage_metric!(counter, "geocode", "lookup_retries"), "Address service calls retried after a failure");
}
