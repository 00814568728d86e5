// Data processing pipeline

pub mod processing;

pub use processing::clean;
