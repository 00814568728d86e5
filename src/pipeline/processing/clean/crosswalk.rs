use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::constants::DC_TRACTS;
use crate::error::{CleanerError, Result, RowError, TractLookupError};
use crate::types::Row;

/// Column of the reference table holding the canonical tract code
pub const CANONICAL_TRACT_COLUMN: &str = "census_tract";

/// Flattened census tract crosswalk: every spelling of a tract that appears in
/// the reference table maps to that row's canonical code. Built once per run
/// and shared read-only between cleaners.
#[derive(Debug, Clone, Default)]
pub struct TractCrosswalk {
    mapping: HashMap<String, String>,
}

impl TractCrosswalk {
    /// Load the reference table from a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            CleanerError::Crosswalk(format!("failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file, CANONICAL_TRACT_COLUMN)
    }

    /// Build the crosswalk from CSV data whose `canonical_column` holds the
    /// canonical code. Blank cells are skipped. A spelling claimed by two
    /// different canonical codes is rejected.
    pub fn from_reader<R: Read>(reader: R, canonical_column: &str) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let canonical_idx = headers
            .iter()
            .position(|h| h == canonical_column)
            .ok_or_else(|| {
                CleanerError::Crosswalk(format!("reference table has no '{}' column", canonical_column))
            })?;

        let mut mapping: HashMap<String, String> = HashMap::new();
        for record in csv_reader.records() {
            let record = record?;
            let canonical = match record.get(canonical_idx).map(str::trim) {
                Some(code) if !code.is_empty() => code.to_string(),
                _ => continue,
            };

            for alternate in record.iter().map(str::trim).filter(|v| !v.is_empty()) {
                match mapping.get(alternate) {
                    Some(existing) if existing != &canonical => {
                        return Err(CleanerError::Crosswalk(format!(
                            "'{}' maps to both '{}' and '{}'",
                            alternate, existing, canonical
                        )));
                    }
                    Some(_) => {}
                    None => {
                        mapping.insert(alternate.to_string(), canonical.clone());
                    }
                }
            }
        }

        debug!(entries = mapping.len(), "built census tract crosswalk");
        Ok(Self { mapping })
    }

    /// Canonical code for any known spelling of a tract
    pub fn canonicalize(&self, code: &str) -> std::result::Result<&str, TractLookupError> {
        self.mapping
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| TractLookupError(code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Overwrite `column` with its canonical code. Null is left alone; an
    /// unknown code fails the row.
    pub fn rename_census_tract(
        &self,
        row: &mut Row,
        column: &str,
    ) -> std::result::Result<(), RowError> {
        if let Some(code) = row.text(column) {
            let canonical = self.canonicalize(code)?.to_string();
            row.set(column, canonical);
        }
        Ok(())
    }

    /// Best-effort variant of `rename_census_tract`: an unknown code is logged
    /// and the value is kept.
    pub fn replace_tracts(&self, row: &mut Row, row_num: usize, column: &str) {
        let Some(code) = row.text(column) else {
            return;
        };
        match self.canonicalize(code) {
            Ok(canonical) => {
                let canonical = canonical.to_string();
                row.set(column, canonical);
            }
            Err(e) => warn!(row_num, column, "{}", e),
        }
    }
}

/// Census tracts belonging to the jurisdiction of interest
#[derive(Debug, Clone)]
pub struct TractFilter {
    tracts: HashSet<String>,
}

impl TractFilter {
    pub fn new<I, S>(tracts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tracts: tracts.into_iter().map(Into::into).collect(),
        }
    }

    /// The District of Columbia tract list
    pub fn district_of_columbia() -> Self {
        Self::new(DC_TRACTS.iter().copied())
    }

    /// Whether the row's tract is inside the jurisdiction; null never is
    pub fn contains(&self, row: &Row, column: &str) -> bool {
        row.text(column).map_or(false, |tract| self.tracts.contains(tract))
    }
}

impl Default for TractFilter {
    fn default() -> Self {
        Self::district_of_columbia()
    }
}
