use std::sync::Arc;

use tracing::debug;

use crate::app::ports::AddressLookupPort;
use crate::constants::{CLUSTER_DESC_MAP, DEFAULT_STREETVIEW_HEADING};
use crate::domain::AddressRecord;
use crate::error::LookupError;
use crate::metrics::geocode as geocode_metrics;
use crate::pipeline::processing::clean::formatters::{capitalize, psa_label};
use crate::types::{FieldValue, Row};

/// Geographic columns tracked by the backfill
#[derive(Debug, Clone)]
pub struct GeoColumns {
    pub resolved_id: String,
    pub ward: String,
    pub cluster: String,
    pub cluster_desc: String,
    pub zip: String,
    /// Display label written alongside a backfilled zip
    pub zip_label: String,
    pub anc: String,
    pub census_tract: String,
    pub status: String,
    pub full_address: String,
    pub image_url: String,
    pub street_view_url: String,
    pub psa: String,
    pub latitude: String,
    pub longitude: String,
}

impl GeoColumns {
    pub fn project() -> Self {
        Self {
            resolved_id: "mar_id".to_string(),
            ward: "Ward2012".to_string(),
            cluster: "Cluster_tr2000".to_string(),
            cluster_desc: "Cluster_tr2000_name".to_string(),
            zip: "Proj_Zip".to_string(),
            zip_label: "Zip".to_string(),
            anc: "Anc2012".to_string(),
            census_tract: "Geo2010".to_string(),
            status: "Status".to_string(),
            full_address: "Proj_addre".to_string(),
            image_url: "Proj_image_url".to_string(),
            street_view_url: "Proj_streetview_url".to_string(),
            psa: "Psa2012".to_string(),
            latitude: "Proj_lat".to_string(),
            longitude: "Proj_lon".to_string(),
        }
    }

    /// Add every tracked column and the zip label as null where the row lacks
    /// them, so all rows of a table share one set of columns
    pub fn ensure_columns(&self, row: &mut Row) {
        let extra = [self.resolved_id.as_str(), self.zip_label.as_str()];
        for column in self.tracked().into_iter().chain(extra) {
            if !row.contains(column) {
                row.set(column, FieldValue::Null);
            }
        }
    }

    fn tracked(&self) -> [&str; 11] {
        [
            &self.ward,
            &self.cluster,
            &self.cluster_desc,
            &self.zip,
            &self.anc,
            &self.census_tract,
            &self.status,
            &self.full_address,
            &self.image_url,
            &self.street_view_url,
            &self.psa,
        ]
    }
}

/// What a backfill pass did to a row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Whether the address service was called
    pub looked_up: bool,
    /// Columns that were null and now hold a value
    pub filled: Vec<String>,
}

/// Fills null geographic columns from the canonical address record of the
/// row's resolved id. A column that already holds a value is never touched.
pub struct GeocodeBackfill {
    lookup: Arc<dyn AddressLookupPort>,
    columns: GeoColumns,
    street_view_heading: u16,
}

impl GeocodeBackfill {
    pub fn new(lookup: Arc<dyn AddressLookupPort>, columns: GeoColumns) -> Self {
        Self {
            lookup,
            columns,
            street_view_heading: DEFAULT_STREETVIEW_HEADING,
        }
    }

    pub fn with_street_view_heading(mut self, heading: u16) -> Self {
        self.street_view_heading = heading;
        self
    }

    pub async fn backfill(
        &self,
        row: &mut Row,
        row_num: usize,
    ) -> Result<BackfillReport, LookupError> {
        let c = &self.columns;
        let mut report = BackfillReport::default();

        let Some(resolved_id) = row.text(&c.resolved_id).map(str::to_string) else {
            return Ok(report);
        };

        let missing: Vec<String> = c
            .tracked()
            .iter()
            .filter(|column| row.is_null(column))
            .map(|column| column.to_string())
            .collect();
        if missing.is_empty() {
            return Ok(report);
        }

        report.looked_up = true;
        geocode_metrics::backfill_lookup();
        let Some(record) = self.lookup.by_address_id(&resolved_id).await? else {
            debug!(row_num, address_id = %resolved_id, "resolved id has no address record");
            return Ok(report);
        };

        self.apply(row, &record, &missing, &mut report);
        geocode_metrics::fields_backfilled(report.filled.len());
        debug!(row_num, filled = ?report.filled, "backfilled geocode fields");
        Ok(report)
    }

    fn apply(&self, row: &mut Row, record: &AddressRecord, missing: &[String], report: &mut BackfillReport) {
        let c = &self.columns;
        let is_missing = |column: &str| missing.iter().any(|m| m == column);
        let mut fill = |row: &mut Row, column: &str, value: Option<String>| {
            if let Some(value) = value {
                row.set(column, value);
                report.filled.push(column.to_string());
            }
        };

        if is_missing(&c.ward) {
            fill(row, &c.ward, record.ward.as_deref().map(capitalize));
        }

        if is_missing(&c.cluster) {
            fill(row, &c.cluster, record.cluster.clone());
        }

        // Derived from the (possibly just filled) cluster; an unmapped cluster
        // leaves the description null.
        if is_missing(&c.cluster_desc) {
            let desc = row
                .text(&c.cluster)
                .and_then(|cluster| CLUSTER_DESC_MAP.get(cluster))
                .map(|desc| desc.to_string());
            fill(row, &c.cluster_desc, desc);
        }

        if is_missing(&c.zip) {
            if let Some(zip) = record.zipcode.clone() {
                row.set(c.zip_label.as_str(), format!("ZIP {}", zip));
                fill(row, &c.zip, Some(zip));
            }
        }

        if is_missing(&c.anc) {
            fill(row, &c.anc, record.anc.clone());
        }
        if is_missing(&c.census_tract) {
            fill(row, &c.census_tract, record.census_tract.clone());
        }
        if is_missing(&c.status) {
            fill(row, &c.status, record.status.clone());
        }
        if is_missing(&c.full_address) {
            fill(row, &c.full_address, record.full_address.clone());
        }

        if is_missing(&c.street_view_url) {
            let url = record
                .street_view_url
                .clone()
                .or_else(|| self.street_view_url(row));
            fill(row, &c.street_view_url, url);
        }

        if is_missing(&c.image_url) {
            let url = match (&record.image_url, &record.image_dir, &record.image_name) {
                (Some(base), Some(dir), Some(name)) => Some(format!("{}/{}/{}", base, dir, name)),
                _ => None,
            };
            fill(row, &c.image_url, url);
        }

        if is_missing(&c.psa) {
            fill(row, &c.psa, record.psa.as_deref().map(psa_label));
        }
    }

    /// Street view link built from the row's own coordinates
    fn street_view_url(&self, row: &Row) -> Option<String> {
        let lat = row.text(&self.columns.latitude)?;
        let lon = row.text(&self.columns.longitude)?;
        Some(format!(
            "http://maps.google.com/maps?z=16&layer=c&cbll={},{}&cbp=11,{},,0,2.09",
            lat, lon, self.street_view_heading
        ))
    }
}

/// Fill `column` with `default` when it is null
pub fn default_if_null(row: &mut Row, column: &str, default: &str) {
    if row.is_null(column) {
        row.set(column, FieldValue::text(default));
    }
}
