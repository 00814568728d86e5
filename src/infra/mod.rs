// Adapters for the address service and CSV files

pub mod csv_output_adapter;
pub mod csv_source;
pub mod mar_client;

pub use csv_output_adapter::CsvCleanOutput;
pub use mar_client::MarClient;
