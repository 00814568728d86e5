//! Metrics for the cleaning pipeline
//!
//! Each stage records through its own submodule so metric names stay in one
//! place. Recording is a no-op until `init_metrics` installs a recorder.

pub mod clean;
pub mod geocode;

use std::net::SocketAddr;
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Default listener for the Prometheus exporter
pub const DEFAULT_METRICS_ADDR: &str = "127.0.0.1:9898";

/// Install the Prometheus recorder and HTTP exporter. Must be called from
/// within a tokio runtime.
///
/// Idempotent. The listen address comes from `HOUSING_CLEANER_METRICS_ADDR`.
pub fn init_metrics() {
    INIT.call_once(|| {
        let addr_str = std::env::var("HOUSING_CLEANER_METRICS_ADDR")
            .unwrap_or_else(|_| DEFAULT_METRICS_ADDR.to_string());
        let addr: SocketAddr = match addr_str.parse() {
            Ok(addr) => addr,
            Err(_) => {
                warn!("Invalid metrics addr '{}', using {}", addr_str, DEFAULT_METRICS_ADDR);
                ([127, 0, 0, 1], 9898).into()
            }
        };

        let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
        let (recorder, exporter) = match builder.build() {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Failed to build Prometheus exporter: {}", e);
                return;
            }
        };

        let handle = recorder.handle();
        if let Err(e) = ::metrics::set_global_recorder(recorder) {
            warn!("Failed to install Prometheus recorder: {}", e);
            return;
        }
        let _ = HANDLE.set(handle);
        clean::register();
        geocode::register();

        // The exporter serves scrapes for the rest of the process
        tokio::spawn(async move {
            if exporter.await.is_err() {
                warn!("Prometheus exporter stopped");
            }
        });
        info!("Prometheus exporter listening on http://{}/metrics", addr);
    });
}

/// Render the current snapshot in Prometheus text format, if a recorder is installed
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

/// Builds metric names following `housing_cleaner_{stage}_{name}[_total]`
macro_rules! stage_metric {
    (counter, $stage:literal, $name:literal) => {
        concat!("housing_cleaner_", $stage, "_", $name, "_total")
    };
    (histogram, $stage:literal, $name:literal) => {
        concat!("housing_cleaner_", $stage, "_", $name)
    };
}

pub(crate) use stage_metric;

#[cfg(test)]
mod tests {
    #[test]
    fn test_stage_metric_names() {
        assert_eq!(
            super::stage_metric!(counter, "clean", "rows_cleaned"),
            "housing_cleaner_clean_rows_cleaned_total"
        );
        assert_eq!(
            super::stage_metric!(histogram, "geocode", "fields_backfilled"),
            "housing_cleaner_geocode_fields_backfilled"
        );
    }

    #[tokio::test]
    async fn test_init_installs_recorder_once() {
        std::env::set_var("HOUSING_CLEANER_METRICS_ADDR", "127.0.0.1:0");
        super::init_metrics();
        super::init_metrics();

        super::clean::row_cleaned("project");
        let rendered = super::render().expect("recorder installed");
        assert!(rendered.contains("housing_cleaner_clean_rows_cleaned_total"));
    }

    #[test]
    fn test_recording_without_recorder_is_harmless() {
        super::clean::row_cleaned("project");
        super::geocode::resolved("lat_lon");
        super::geocode::fields_backfilled(3);
    }
}
