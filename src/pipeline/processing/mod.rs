// Pipeline processing: row cleaning and its per-table strategies

pub mod clean;
