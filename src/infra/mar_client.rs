use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app::ports::AddressLookupPort;
use crate::config::MarConfig;
use crate::domain::AddressRecord;
use crate::error::{LookupError, Result};
use crate::metrics;

/// Client for the Master Address Repository location web service
pub struct MarClient {
    client: reqwest::Client,
    base_url: String,
    max_attempts: u32,
    initial_backoff: Duration,
}

/// Why a single attempt failed
enum AttemptError {
    /// Worth another try: transport failure, timeout or a 5xx
    Retryable(String),
    Fatal(LookupError),
}

impl MarClient {
    pub fn new(config: &MarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        })
    }

    /// Call `operation` with `params`, retrying with exponential backoff.
    /// Exhausting the retry budget is reported as `ServiceUnavailable`.
    async fn lookup(
        &self,
        operation: &'static str,
        params: &[(&str, &str)],
    ) -> std::result::Result<Option<AddressRecord>, LookupError> {
        let url = format!("{}/{}", self.base_url, operation);
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            match self.attempt(&url, params).await {
                Ok(record) => return Ok(record),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(reason)) if attempt >= self.max_attempts => {
                    warn!(operation, attempts = attempt, "Address service unavailable: {}", reason);
                    return Err(LookupError::ServiceUnavailable {
                        attempts: attempt,
                        reason,
                    });
                }
                Err(AttemptError::Retryable(reason)) => {
                    debug!(
                        operation,
                        attempt,
                        "Address lookup failed, retrying in {}ms: {}",
                        backoff.as_millis(),
                        reason
                    );
                    metrics::geocode::lookup_retry(operation);
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> std::result::Result<Option<AddressRecord>, AttemptError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("f", "json")])
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AttemptError::Retryable(format!("server returned {}", status)));
        }
        if status.is_client_error() {
            // The service answers unknown ids and malformed input with 4xx
            warn!(url, %status, "Address service rejected the request; treating as no match");
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Retryable(e.to_string()))?;
        decode_first_record(&body).map_err(AttemptError::Fatal)
    }
}

/// First row of `returnDataset.Table1`. A bare `{"Table1": [...]}` is also
/// accepted. A null or empty dataset means no match.
pub fn decode_first_record(body: &str) -> std::result::Result<Option<AddressRecord>, LookupError> {
    let value: Value = serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    let dataset = value.get("returnDataset").unwrap_or(&value);

    let first = match dataset.get("Table1").and_then(Value::as_array) {
        Some(rows) => rows.first(),
        None => None,
    };

    match first {
        Some(row) => serde_json::from_value(row.clone())
            .map(Some)
            .map_err(|e| LookupError::Decode(e.to_string())),
        None => Ok(None),
    }
}

#[async_trait]
impl AddressLookupPort for MarClient {
    async fn by_address_id(
        &self,
        address_id: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError> {
        self.lookup("reverseAddressID", &[("aid", address_id)]).await
    }

    async fn by_lat_lon(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError> {
        self.lookup("reverseLatLngGeocoding2", &[("lat", latitude), ("lng", longitude)])
            .await
    }

    async fn by_planar_xy(
        &self,
        x: &str,
        y: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError> {
        self.lookup("reverseGeocoding", &[("x", x), ("y", y)]).await
    }

    async fn by_address_text(
        &self,
        address: &str,
    ) -> std::result::Result<Option<AddressRecord>, LookupError> {
        self.lookup("findLocation2", &[("str", address)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(base_url: &str) -> MarClient {
        let config = MarConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            max_attempts: 3,
            initial_backoff_ms: 1,
        };
        MarClient::new(&config).unwrap()
    }

    fn dataset() -> Value {
        json!({
            "returnDataset": {
                "Table1": [{
                    "ADDRESS_ID": 284216,
                    "WARD": "Ward 6",
                    "ZIPCODE": 20024,
                    "CENSUS_TRACT": "010500",
                    "FULLADDRESS": "1000 4TH STREET SW",
                    "IMAGEURL": ""
                }]
            }
        })
    }

    #[tokio::test]
    async fn test_lookup_by_address_id() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/reverseAddressID"))
            .and(query_param("aid", "284216"))
            .and(query_param("f", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dataset()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let record = client.by_address_id("284216").await.unwrap().unwrap();
        assert_eq!(record.address_id.as_deref(), Some("284216"));
        assert_eq!(record.zipcode.as_deref(), Some("20024"));
        assert_eq!(record.image_url, None);
    }

    #[tokio::test]
    async fn test_lat_lon_and_text_queries() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/reverseLatLngGeocoding2"))
            .and(query_param("lat", "38.87"))
            .and(query_param("lng", "-77.01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dataset()))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/findLocation2"))
            .and(query_param("str", "1000 4th St SW"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"returnDataset": null})))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert!(client.by_lat_lon("38.87", "-77.01").await.unwrap().is_some());
        assert!(client.by_address_text("1000 4th St SW").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/reverseGeocoding"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/reverseGeocoding"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dataset()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let record = client.by_planar_xy("399000", "135000").await.unwrap();
        assert!(record.is_some());
    }

    #[tokio::test]
    async fn test_exhausted_retries_report_outage() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/reverseAddressID"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let err = client.by_address_id("1").await.unwrap_err();
        assert!(matches!(err, LookupError::ServiceUnavailable { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn test_client_error_is_no_match() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/reverseAddressID"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert!(client.by_address_id("999").await.unwrap().is_none());
    }

    #[test]
    fn test_decode_variants() {
        let bare = r#"{"Table1": [{"ADDRESS_ID": "7", "WARD": "Ward 1"}]}"#;
        assert_eq!(
            decode_first_record(bare).unwrap().unwrap().address_id.as_deref(),
            Some("7")
        );

        assert!(decode_first_record(r#"{"returnDataset": {"Table1": []}}"#).unwrap().is_none());
        assert!(matches!(
            decode_first_record("<html>oops</html>"),
            Err(LookupError::Decode(_))
        ));
    }
}
