use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{CleanerError, Result};
use crate::pipeline::processing::clean::registry::CleanerKind;

/// Declared type of a source field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Date,
    Boolean,
    Text,
    Integer,
    Decimal,
    Timestamp,
    #[serde(other)]
    Other,
}

/// One `{source_name, type}` descriptor of a destination table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub source_name: String,
    #[serde(default)]
    pub sql_name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Metadata for one destination table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    pub cleaner: CleanerKind,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl TableMeta {
    /// Descriptor for a source column, if the table declares one
    pub fn field(&self, source_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.source_name == source_name)
    }

    /// Source columns declared as dates
    pub fn date_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.field_type == FieldType::Date)
            .map(|f| f.source_name.clone())
            .collect()
    }
}

/// All destination tables, keyed by table name. Read-only once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaCatalog {
    tables: BTreeMap<String, TableMeta>,
}

impl MetaCatalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CleanerError::Config(format!("Failed to read meta file '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn table(&self, name: &str) -> Option<&TableMeta> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableMeta)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, name: impl Into<String>, meta: TableMeta) {
        self.tables.insert(name.into(), meta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = r#"{
        "project": {
            "cleaner": "ProjectCleaner",
            "replace_table": true,
            "fields": [
                {"source_name": "Nlihc_id", "sql_name": "nlihc_id", "type": "text"},
                {"source_name": "Hud_Own_Effect_dt", "sql_name": "hud_own_effect_dt", "type": "date"},
                {"source_name": "Proj_lat", "sql_name": "proj_lat", "type": "decimal"},
                {"source_name": "Geom", "sql_name": "geom", "type": "geometry"}
            ]
        },
        "wmata_dist": {"cleaner": "WmataDistCleaner", "fields": []}
    }"#;

    #[test]
    fn test_loads_tables_and_cleaners() {
        let catalog = MetaCatalog::from_json(META).unwrap();
        let project = catalog.table("project").unwrap();

        assert_eq!(project.cleaner, CleanerKind::Project);
        assert_eq!(project.fields.len(), 4);
        assert_eq!(project.field("Geom").unwrap().field_type, FieldType::Other);
        assert_eq!(catalog.table("wmata_dist").unwrap().cleaner, CleanerKind::WmataDist);
    }

    #[test]
    fn test_field_lookup_scans_all_fields() {
        let catalog = MetaCatalog::from_json(META).unwrap();
        let project = catalog.table("project").unwrap();

        assert_eq!(
            project.field("Proj_lat").and_then(|f| f.sql_name.as_deref()),
            Some("proj_lat")
        );
        assert!(project.field("not_a_field").is_none());
    }

    #[test]
    fn test_date_fields() {
        let catalog = MetaCatalog::from_json(META).unwrap();
        assert_eq!(
            catalog.table("project").unwrap().date_fields(),
            vec!["Hud_Own_Effect_dt".to_string()]
        );
    }

    #[test]
    fn test_unknown_cleaner_name_is_rejected() {
        let bad = r#"{"t": {"cleaner": "NoSuchCleaner", "fields": []}}"#;
        assert!(MetaCatalog::from_json(bad).is_err());
    }
}
