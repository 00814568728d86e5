use async_trait::async_trait;

use crate::domain::AddressRecord;
use crate::error::{LookupError, Result};
use crate::types::Row;

/// The four operations of the external address/geocode service. Each returns
/// the first matching record, or `None` when the service has no match.
#[async_trait]
pub trait AddressLookupPort: Send + Sync {
    async fn by_address_id(
        &self,
        address_id: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError>;

    async fn by_lat_lon(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError>;

    async fn by_planar_xy(
        &self,
        x: &str,
        y: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError>;

    async fn by_address_text(
        &self,
        address: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError>;
}

/// Destination for cleaned rows and for rows excluded from the load
#[async_trait]
pub trait CleanOutputPort: Send + Sync {
    async fn write_cleaned(&self, row: &Row) -> Result<()>;

    async fn write_removed(&self, row: &Row, reason: &str) -> Result<()>;

    /// Flush everything written so far
    async fn finish(&self) -> Result<()>;
}
