use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::cleaners::{
    BuildingPermitsCleaner, CensusCleaner, CleanOutcome, CleanerContext, CrimeCleaner,
    DcHousingCleaner, DcTaxCleaner, GenericCleaner, HmdaCleaner, NullsOnlyCleaner, ProjectCleaner,
    SubsidyCleaner, TableCleaner, ZoneCountsCleaner,
};
use crate::error::{CleanerError, Result};
use crate::meta::{MetaCatalog, TableMeta};
use crate::types::Row;

/// The closed set of cleaning strategies a table can name in its metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum CleanerKind {
    Generic,
    Project,
    Subsidy,
    BuildingPermits,
    Census,
    CensusTractToNeighborhoodCluster,
    CensusTractToWard,
    Crime,
    DcTax,
    Hmda,
    WmataDist,
    WmataInfo,
    ReacScore,
    RealProperty,
    DcHousing,
    Topa,
    ZoneHousingUnitBedrmCount,
}

impl CleanerKind {
    pub const ALL: [CleanerKind; 17] = [
        CleanerKind::Generic,
        CleanerKind::Project,
        CleanerKind::Subsidy,
        CleanerKind::BuildingPermits,
        CleanerKind::Census,
        CleanerKind::CensusTractToNeighborhoodCluster,
        CleanerKind::CensusTractToWard,
        CleanerKind::Crime,
        CleanerKind::DcTax,
        CleanerKind::Hmda,
        CleanerKind::WmataDist,
        CleanerKind::WmataInfo,
        CleanerKind::ReacScore,
        CleanerKind::RealProperty,
        CleanerKind::DcHousing,
        CleanerKind::Topa,
        CleanerKind::ZoneHousingUnitBedrmCount,
    ];

    /// Name used for the variant in table metadata files
    pub fn name(&self) -> &'static str {
        match self {
            CleanerKind::Generic => "GenericCleaner",
            CleanerKind::Project => "ProjectCleaner",
            CleanerKind::Subsidy => "SubsidyCleaner",
            CleanerKind::BuildingPermits => "BuildingPermitsCleaner",
            CleanerKind::Census => "CensusCleaner",
            CleanerKind::CensusTractToNeighborhoodCluster => "CensusTractToNeighborhoodClusterCleaner",
            CleanerKind::CensusTractToWard => "CensusTractToWardCleaner",
            CleanerKind::Crime => "CrimeCleaner",
            CleanerKind::DcTax => "DCTaxCleaner",
            CleanerKind::Hmda => "hmda_cleaner",
            CleanerKind::WmataDist => "WmataDistCleaner",
            CleanerKind::WmataInfo => "WmataInfoCleaner",
            CleanerKind::ReacScore => "reac_score_cleaner",
            CleanerKind::RealProperty => "real_property_cleaner",
            CleanerKind::DcHousing => "dchousing_cleaner",
            CleanerKind::Topa => "topa_cleaner",
            CleanerKind::ZoneHousingUnitBedrmCount => "Zone_HousingUnit_Bedrm_Count_cleaner",
        }
    }

    /// Construct the cleaner for a table. Only `Project` needs the address
    /// service; building it without one is a configuration error.
    pub fn build(&self, meta: &TableMeta, ctx: &CleanerContext) -> Result<Box<dyn TableCleaner>> {
        let dates = meta.date_fields();
        let cleaner: Box<dyn TableCleaner> = match self {
            CleanerKind::Generic
            | CleanerKind::CensusTractToNeighborhoodCluster
            | CleanerKind::CensusTractToWard
            | CleanerKind::WmataDist
            | CleanerKind::WmataInfo => Box::new(GenericCleaner::new(*self)),
            CleanerKind::Project => {
                let lookup = ctx.lookup.clone().ok_or_else(|| {
                    CleanerError::Config(format!("{} requires an address lookup service", self))
                })?;
                Box::new(ProjectCleaner::new(dates, lookup, ctx.crosswalk.clone()))
            }
            CleanerKind::Subsidy => Box::new(SubsidyCleaner::new(dates)),
            CleanerKind::BuildingPermits => Box::new(BuildingPermitsCleaner::new(dates)),
            CleanerKind::Census => Box::new(CensusCleaner::new(ctx.jurisdiction.clone())),
            CleanerKind::Crime => Box::new(CrimeCleaner::new(dates, ctx.crosswalk.clone())),
            CleanerKind::DcTax => Box::new(DcTaxCleaner::new(dates)),
            CleanerKind::Hmda => Box::new(HmdaCleaner::new(dates)),
            CleanerKind::ReacScore | CleanerKind::RealProperty => {
                Box::new(NullsOnlyCleaner::new(*self, &[""]))
            }
            CleanerKind::DcHousing => Box::new(DcHousingCleaner),
            CleanerKind::Topa => Box::new(NullsOnlyCleaner::new(*self, &["", "\\"])),
            CleanerKind::ZoneHousingUnitBedrmCount => {
                Box::new(ZoneCountsCleaner::new(ctx.crosswalk.clone()))
            }
        };
        Ok(cleaner)
    }
}

impl FromStr for CleanerKind {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self> {
        CleanerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CleanerError::Config(format!("Unknown cleaner: {}", s)))
    }
}

impl TryFrom<String> for CleanerKind {
    type Error = CleanerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl Serialize for CleanerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for CleanerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cleaners keyed by destination table name
pub struct CleanerRegistry {
    cleaners: HashMap<String, Box<dyn TableCleaner>>,
}

impl CleanerRegistry {
    pub fn new() -> Self {
        Self {
            cleaners: HashMap::new(),
        }
    }

    /// Build one cleaner per table declared in the catalog
    pub fn from_catalog(catalog: &MetaCatalog, ctx: &CleanerContext) -> Result<Self> {
        let mut registry = Self::new();
        for (table, meta) in catalog.tables() {
            registry.register(table.to_string(), meta.cleaner.build(meta, ctx)?);
        }
        Ok(registry)
    }

    /// Register a cleaner for a specific table
    pub fn register(&mut self, table: String, cleaner: Box<dyn TableCleaner>) {
        self.cleaners.insert(table, cleaner);
    }

    pub fn get(&self, table: &str) -> Option<&dyn TableCleaner> {
        self.cleaners.get(table).map(|c| c.as_ref())
    }

    /// Clean a row with the cleaner registered for `table`
    pub async fn clean(&self, table: &str, row: Row, row_num: usize) -> Result<CleanOutcome> {
        let cleaner = self
            .get(table)
            .ok_or_else(|| CleanerError::UnknownTable(table.to_string()))?;

        cleaner
            .clean(row, row_num)
            .await
            .map_err(|source| CleanerError::Row {
                table: table.to_string(),
                row_num,
                source,
            })
    }

    /// List all registered table names
    pub fn list_tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = self.cleaners.keys().map(|k| k.as_str()).collect();
        tables.sort_unstable();
        tables
    }
}

impl Default for CleanerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::clean::address::tests::StubLookup;
    use crate::pipeline::processing::clean::crosswalk::{TractCrosswalk, CANONICAL_TRACT_COLUMN};
    use std::sync::Arc;

    const META: &str = r#"{
        "topa": {"cleaner": "topa_cleaner", "fields": []},
        "wmata_dist": {"cleaner": "WmataDistCleaner", "fields": []},
        "dc_tax": {"cleaner": "DCTaxCleaner", "fields": [{"source_name": "SALEDATE", "type": "date"}]}
    }"#;

    fn context() -> CleanerContext {
        let data = "census_tract,short\nTract 1.00,000100\n";
        CleanerContext::new(TractCrosswalk::from_reader(data.as_bytes(), CANONICAL_TRACT_COLUMN).unwrap())
    }

    #[test]
    fn test_names_round_trip_for_every_kind() {
        for kind in CleanerKind::ALL {
            assert_eq!(kind.name().parse::<CleanerKind>().unwrap(), kind);
        }
        assert!("NotACleaner".parse::<CleanerKind>().is_err());
    }

    #[test]
    fn test_registry_built_from_catalog() {
        let catalog = MetaCatalog::from_json(META).unwrap();
        let registry = CleanerRegistry::from_catalog(&catalog, &context()).unwrap();

        assert_eq!(registry.list_tables(), vec!["dc_tax", "topa", "wmata_dist"]);
        assert_eq!(registry.get("topa").unwrap().kind(), CleanerKind::Topa);
        assert_eq!(registry.get("wmata_dist").unwrap().kind(), CleanerKind::WmataDist);
    }

    #[test]
    fn test_project_requires_lookup() {
        let meta = TableMeta {
            cleaner: CleanerKind::Project,
            fields: Vec::new(),
        };

        let err = CleanerKind::Project.build(&meta, &context()).err().unwrap();
        assert!(matches!(err, CleanerError::Config(_)));

        let ctx = context().with_lookup(Arc::new(StubLookup::default()));
        assert!(CleanerKind::Project.build(&meta, &ctx).is_ok());
    }

    #[tokio::test]
    async fn test_clean_dispatches_by_table() {
        let catalog = MetaCatalog::from_json(META).unwrap();
        let registry = CleanerRegistry::from_catalog(&catalog, &context()).unwrap();

        let row = Row::from_pairs([("SALEDATE", "1/2/2015"), ("VACANT_USE", "Y")]);
        let outcome = registry.clean("dc_tax", row, 1).await.unwrap();
        assert_eq!(outcome.row().text("SALEDATE"), Some("2015-01-02"));
    }

    #[tokio::test]
    async fn test_unknown_table_and_row_errors() {
        let catalog = MetaCatalog::from_json(META).unwrap();
        let registry = CleanerRegistry::from_catalog(&catalog, &context()).unwrap();

        let err = registry.clean("nope", Row::new(), 1).await.unwrap_err();
        assert!(matches!(err, CleanerError::UnknownTable(_)));

        let row = Row::from_pairs([("VACANT_USE", "maybe")]);
        let err = registry.clean("dc_tax", row, 5).await.unwrap_err();
        assert!(matches!(err, CleanerError::Row { row_num: 5, .. }));
        assert!(!err.is_fatal());
    }
}
