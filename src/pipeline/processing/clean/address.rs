use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::app::ports::AddressLookupPort;
use crate::domain::AddressRecord;
use crate::error::LookupError;
use crate::metrics::geocode as geocode_metrics;
use crate::types::{FieldValue, Row};

/// Which piece of evidence produced a resolved address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    AddressId,
    LatLon,
    PlanarXy,
    AddressText,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::AddressId => "address_id",
            ResolutionStrategy::LatLon => "lat_lon",
            ResolutionStrategy::PlanarXy => "planar_xy",
            ResolutionStrategy::AddressText => "address_text",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source columns the resolver reads, and the column it writes the resolved
/// identifier to
#[derive(Debug, Clone)]
pub struct AddressColumns {
    pub address_id: String,
    pub latitude: String,
    pub longitude: String,
    pub x: String,
    pub y: String,
    pub address: String,
    pub resolved_id: String,
}

impl AddressColumns {
    /// Column names used by the preservation catalog project table
    pub fn project() -> Self {
        Self {
            address_id: "Proj_address_id".to_string(),
            latitude: "Proj_lat".to_string(),
            longitude: "Proj_lon".to_string(),
            x: "Proj_x".to_string(),
            y: "Proj_y".to_string(),
            address: "Proj_addre".to_string(),
            resolved_id: "mar_id".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub strategy: ResolutionStrategy,
    pub record: AddressRecord,
}

/// Maps a row with partial location evidence onto a canonical address.
///
/// A known address id is tried first. When that is missing or unmatched,
/// exactly one of the remaining strategies is attempted, picked by the first
/// evidence present: lat/lon, then planar x/y, then a free-text address that
/// starts with a street number.
pub struct AddressResolver {
    lookup: Arc<dyn AddressLookupPort>,
    columns: AddressColumns,
}

impl AddressResolver {
    pub fn new(lookup: Arc<dyn AddressLookupPort>, columns: AddressColumns) -> Self {
        Self { lookup, columns }
    }

    pub fn columns(&self) -> &AddressColumns {
        &self.columns
    }

    pub async fn resolve(&self, row: &Row) -> Result<Option<Resolution>, LookupError> {
        let c = &self.columns;

        if let Some(address_id) = row.text(&c.address_id) {
            if let Some(record) = self.lookup.by_address_id(address_id).await? {
                return Ok(Some(Resolution {
                    strategy: ResolutionStrategy::AddressId,
                    record,
                }));
            }
            debug!(address_id, "address id has no match, falling back to location");
        }

        let attempt = match (
            row.text(&c.latitude),
            row.text(&c.longitude),
            row.text(&c.x),
            row.text(&c.y),
            row.text(&c.address),
        ) {
            (Some(lat), Some(lon), _, _, _) => Some((
                ResolutionStrategy::LatLon,
                self.lookup.by_lat_lon(lat, lon).await?,
            )),
            (_, _, Some(x), Some(y), _) => Some((
                ResolutionStrategy::PlanarXy,
                self.lookup.by_planar_xy(x, y).await?,
            )),
            (_, _, _, _, Some(address)) => match first_street_address(address) {
                Some(first) => Some((
                    ResolutionStrategy::AddressText,
                    self.lookup.by_address_text(first).await?,
                )),
                None => None,
            },
            _ => None,
        };

        Ok(attempt.and_then(|(strategy, record)| record.map(|record| Resolution { strategy, record })))
    }

    /// Resolve the row and write the canonical address id into the resolved
    /// id column. An unresolved row keeps (or gains) a null in that column.
    pub async fn add_resolved_id(
        &self,
        row: &mut Row,
        row_num: usize,
    ) -> Result<Option<Resolution>, LookupError> {
        let resolution = self.resolve(row).await?;
        let resolved_id = resolution
            .as_ref()
            .and_then(|r| r.record.address_id.clone());

        match (&resolution, resolved_id) {
            (Some(r), Some(id)) => {
                geocode_metrics::resolved(r.strategy.as_str());
                debug!(row_num, strategy = %r.strategy, address_id = %id, "resolved address");
                row.set(self.columns.resolved_id.as_str(), id);
            }
            _ => {
                geocode_metrics::unresolved();
                debug!(row_num, "no address match");
                if !row.contains(&self.columns.resolved_id) {
                    row.set(self.columns.resolved_id.as_str(), FieldValue::Null);
                }
            }
        }

        Ok(resolution)
    }
}

/// The first `;`-separated address of a free-text field, provided the text
/// starts with a numeric street number
pub fn first_street_address(address: &str) -> Option<&str> {
    let street_number = address.split(' ').next()?;
    street_number.parse::<i64>().ok()?;
    address.split(';').next()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Stub lookup service that counts calls per operation
    #[derive(Default)]
    pub(crate) struct StubLookup {
        pub by_id: Mutex<Option<AddressRecord>>,
        pub by_location: Mutex<Option<AddressRecord>>,
        pub id_calls: AtomicUsize,
        pub lat_lon_calls: AtomicUsize,
        pub xy_calls: AtomicUsize,
        pub text_calls: AtomicUsize,
        pub last_text: Mutex<Option<String>>,
        pub fail: bool,
    }

    impl StubLookup {
        pub(crate) fn with_id_match(record: AddressRecord) -> Self {
            Self {
                by_id: Mutex::new(Some(record)),
                ..Default::default()
            }
        }

        pub(crate) fn with_location_match(record: AddressRecord) -> Self {
            Self {
                by_location: Mutex::new(Some(record)),
                ..Default::default()
            }
        }

        pub(crate) fn unavailable() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub(crate) fn total_calls(&self) -> usize {
            self.id_calls.load(Ordering::SeqCst)
                + self.lat_lon_calls.load(Ordering::SeqCst)
                + self.xy_calls.load(Ordering::SeqCst)
                + self.text_calls.load(Ordering::SeqCst)
        }

        fn outcome(&self, slot: &Mutex<Option<AddressRecord>>) -> Result<Option<AddressRecord>, LookupError> {
            if self.fail {
                return Err(LookupError::ServiceUnavailable {
                    attempts: 3,
                    reason: "stub outage".to_string(),
                });
            }
            Ok(slot.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl AddressLookupPort for StubLookup {
        async fn by_address_id(
            &self,
            _address_id: &str,
        ) -> Result<Option<AddressRecord>, LookupError> {
            self.id_calls.fetch_add(1, Ordering::SeqCst);
            self.outcome(&self.by_id)
        }

        async fn by_lat_lon(
            &self,
            _latitude: &str,
            _longitude: &str,
        ) -> Result<Option<AddressRecord>, LookupError> {
            self.lat_lon_calls.fetch_add(1, Ordering::SeqCst);
            self.outcome(&self.by_location)
        }

        async fn by_planar_xy(
            &self,
            _x: &str,
            _y: &str,
        ) -> Result<Option<AddressRecord>, LookupError> {
            self.xy_calls.fetch_add(1, Ordering::SeqCst);
            self.outcome(&self.by_location)
        }

        async fn by_address_text(
            &self,
            address: &str,
        ) -> Result<Option<AddressRecord>, LookupError> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_text.lock().unwrap() = Some(address.to_string());
            self.outcome(&self.by_location)
        }
    }

    pub(crate) fn record_with_id(id: &str) -> AddressRecord {
        AddressRecord {
            address_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn project_row(pairs: &[(&str, &str)]) -> Row {
        let mut row = Row::new();
        for column in ["Proj_address_id", "Proj_lat", "Proj_lon", "Proj_x", "Proj_y", "Proj_addre"] {
            row.set(column, FieldValue::Null);
        }
        for (k, v) in pairs {
            row.set(*k, *v);
        }
        row
    }

    fn resolver(stub: &Arc<StubLookup>) -> AddressResolver {
        AddressResolver::new(stub.clone(), AddressColumns::project())
    }

    #[tokio::test]
    async fn test_known_address_id_skips_location_lookups() {
        let stub = Arc::new(StubLookup::with_id_match(record_with_id("300")));
        let mut row = project_row(&[
            ("Proj_address_id", "300"),
            ("Proj_lat", "38.9"),
            ("Proj_lon", "-77.0"),
            ("Proj_addre", "100 Main St"),
        ]);

        let resolution = resolver(&stub).add_resolved_id(&mut row, 1).await.unwrap().unwrap();

        assert_eq!(resolution.strategy, ResolutionStrategy::AddressId);
        assert_eq!(row.text("mar_id"), Some("300"));
        assert_eq!(stub.id_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.lat_lon_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.xy_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.text_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unmatched_id_falls_back_to_lat_lon() {
        let stub = Arc::new(StubLookup::with_location_match(record_with_id("155")));
        let mut row = project_row(&[
            ("Proj_address_id", "999"),
            ("Proj_lat", "38.9"),
            ("Proj_lon", "-77.0"),
            ("Proj_x", "399000"),
            ("Proj_y", "137000"),
        ]);

        let resolution = resolver(&stub).add_resolved_id(&mut row, 1).await.unwrap().unwrap();

        assert_eq!(resolution.strategy, ResolutionStrategy::LatLon);
        assert_eq!(row.text("mar_id"), Some("155"));
        assert_eq!(stub.id_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.lat_lon_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.xy_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_planar_xy_used_without_lat_lon() {
        let stub = Arc::new(StubLookup::with_location_match(record_with_id("7")));
        let mut row = project_row(&[("Proj_lat", "38.9"), ("Proj_x", "399000"), ("Proj_y", "137000")]);

        let resolution = resolver(&stub).add_resolved_id(&mut row, 1).await.unwrap().unwrap();

        assert_eq!(resolution.strategy, ResolutionStrategy::PlanarXy);
        assert_eq!(stub.id_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.lat_lon_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.xy_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_address_text_uses_first_sub_address() {
        let stub = Arc::new(StubLookup::with_location_match(record_with_id("42")));
        let mut row = project_row(&[("Proj_addre", "1330 7th St NW; 1340 7th St NW")]);

        let resolution = resolver(&stub).add_resolved_id(&mut row, 1).await.unwrap().unwrap();

        assert_eq!(resolution.strategy, ResolutionStrategy::AddressText);
        assert_eq!(
            stub.last_text.lock().unwrap().as_deref(),
            Some("1330 7th St NW")
        );
    }

    #[tokio::test]
    async fn test_address_without_street_number_is_not_looked_up() {
        let stub = Arc::new(StubLookup::with_location_match(record_with_id("42")));
        let mut row = project_row(&[("Proj_addre", "Scattered sites")]);

        let resolution = resolver(&stub).add_resolved_id(&mut row, 1).await.unwrap();

        assert!(resolution.is_none());
        assert!(row.is_null("mar_id"));
        assert_eq!(stub.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_evidence_leaves_row_unresolved() {
        let stub = Arc::new(StubLookup::default());
        let mut row = project_row(&[]);

        let resolution = resolver(&stub).add_resolved_id(&mut row, 1).await.unwrap();

        assert!(resolution.is_none());
        assert!(row.contains("mar_id"));
        assert!(row.is_null("mar_id"));
        assert_eq!(stub.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_outage_propagates() {
        let stub = Arc::new(StubLookup::unavailable());
        let mut row = project_row(&[("Proj_address_id", "300")]);

        let err = resolver(&stub).add_resolved_id(&mut row, 1).await.unwrap_err();
        assert!(matches!(err, LookupError::ServiceUnavailable { .. }));
    }

    #[test]
    fn test_first_street_address() {
        assert_eq!(first_street_address("1330 7th St NW"), Some("1330 7th St NW"));
        assert_eq!(first_street_address("12 A St; 14 A St"), Some("12 A St"));
        assert_eq!(first_street_address("A St NW"), None);
        assert_eq!(first_street_address(""), None);
    }
}
