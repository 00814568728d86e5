// Row cleaning: null normalization, field formatting, tract canonicalization,
// address resolution and geocode backfill, composed per table.

pub mod address;
pub mod backfill;
pub mod cleaners;
pub mod crosswalk;
pub mod formatters;
pub mod nulls;
pub mod registry;

pub use cleaners::{CleanOutcome, CleanerContext, TableCleaner};
pub use registry::{CleanerKind, CleanerRegistry};
