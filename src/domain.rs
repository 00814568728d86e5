use serde::{Deserialize, Deserializer, Serialize};

/// One address record returned by the Master Address Repository lookup
/// service. Read-only; used only to fill gaps in a row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "ADDRESS_ID", default, deserialize_with = "string_or_number")]
    pub address_id: Option<String>,
    #[serde(rename = "WARD", default, deserialize_with = "string_or_number")]
    pub ward: Option<String>,
    #[serde(rename = "CLUSTER_", default, deserialize_with = "string_or_number")]
    pub cluster: Option<String>,
    #[serde(rename = "ZIPCODE", default, deserialize_with = "string_or_number")]
    pub zipcode: Option<String>,
    #[serde(rename = "ANC_2012", default, deserialize_with = "string_or_number")]
    pub anc: Option<String>,
    #[serde(rename = "CENSUS_TRACT", default, deserialize_with = "string_or_number")]
    pub census_tract: Option<String>,
    #[serde(rename = "STATUS", default, deserialize_with = "string_or_number")]
    pub status: Option<String>,
    #[serde(rename = "FULLADDRESS", default, deserialize_with = "string_or_number")]
    pub full_address: Option<String>,
    #[serde(rename = "IMAGEURL", default, deserialize_with = "string_or_number")]
    pub image_url: Option<String>,
    #[serde(rename = "IMAGEDIR", default, deserialize_with = "string_or_number")]
    pub image_dir: Option<String>,
    #[serde(rename = "IMAGENAME", default, deserialize_with = "string_or_number")]
    pub image_name: Option<String>,
    #[serde(rename = "STREETVIEWURL", default, deserialize_with = "string_or_number")]
    pub street_view_url: Option<String>,
    #[serde(rename = "PSA", default, deserialize_with = "string_or_number")]
    pub psa: Option<String>,
}

/// The service is inconsistent about quoting: zip codes and ids come back as
/// numbers on some endpoints and strings on others. Blank strings count as
/// absent.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
