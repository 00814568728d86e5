use thiserror::Error;

/// Failures talking to the address lookup service
#[derive(Error, Debug, Clone)]
pub enum LookupError {
    #[error("address service unavailable after {attempts} attempt(s): {reason}")]
    ServiceUnavailable { attempts: u32, reason: String },

    #[error("address service returned an unreadable response: {0}")]
    Decode(String),
}

/// A tract code that appears nowhere in the crosswalk
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no crosswalk entry for census tract '{0}'")]
pub struct TractLookupError(pub String);

/// Failures confined to a single row
#[derive(Error, Debug)]
pub enum RowError {
    #[error("value '{value}' in '{field}' is not a recognized boolean")]
    InvalidBoolean { field: String, value: String },

    #[error("value '{value}' in '{field}' is invalid: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    UnknownTract(#[from] TractLookupError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl RowError {
    /// Whether this failure must abort the whole run rather than just the row
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RowError::Lookup(LookupError::ServiceUnavailable { .. })
        )
    }
}

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No cleaner registered for table: {0}")]
    UnknownTable(String),

    #[error("Crosswalk error: {0}")]
    Crosswalk(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("row {row_num} of '{table}': {source}")]
    Row {
        table: String,
        row_num: usize,
        #[source]
        source: RowError,
    },
}

impl CleanerError {
    /// Whether the run must stop. Row failures other than a service outage
    /// are recorded against the row and the run carries on.
    pub fn is_fatal(&self) -> bool {
        match self {
            CleanerError::Row { source, .. } => source.is_fatal(),
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanerError>;
