//! Per-row outcome counters, labelled by destination table

use crate::metrics::stage_metric;

pub fn row_cleaned(table: &str) {
    ::metrics::counter!(stage_metric!(counter, "clean", "rows_cleaned"), "table" => table.to_string())
        .increment(1);
}

pub fn row_dropped(table: &str) {
    ::metrics::counter!(stage_metric!(counter, "clean", "rows_dropped"), "table" => table.to_string())
        .increment(1);
}

pub fn row_failed(table: &str) {
    ::metrics::counter!(stage_metric!(counter, "clean", "rows_failed"), "table" => table.to_string())
        .increment(1);
}

/// Pre-register so the series show up before the first row
pub(crate) fn register() {
    ::metrics::describe_counter!(stage_metric!(counter, "clean", "rows_cleaned"), "Rows emitted to the cleaned output");
    ::metrics::describe_counter!(stage_metric!(counter, "clean", "rows_dropped"), "Rows excluded by a table filter");
    ::metrics::describe_counter!(stage_metric!(counter, "clean", "rows_failed"), "Rows that could not be interpreted");
}
