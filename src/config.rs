use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CleanerError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_MAR_URL: &str = "https://citizenatlas.dc.gov/newwebservices/locationverifier.asmx";

const MAR_URL_ENV: &str = "HOUSING_CLEANER_MAR_URL";
const CONCURRENCY_ENV: &str = "HOUSING_CLEANER_CONCURRENCY";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mar: MarConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Address service endpoint and its retry budget
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Attempts per lookup, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry
    pub initial_backoff_ms: u64,
}

impl Default for MarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MAR_URL.to_string(),
            timeout_seconds: 30,
            max_attempts: 3,
            initial_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub meta_path: PathBuf,
    pub crosswalk_path: PathBuf,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub log_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            meta_path: PathBuf::from("meta.json"),
            crosswalk_path: PathBuf::from("tract_crosswalk.csv"),
            output_dir: PathBuf::from("output"),
            concurrency: 8,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, then apply environment
    /// overrides
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CleanerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&config_content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOUSING_CLEANER_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(MAR_URL_ENV) {
            self.mar.base_url = url;
        }
        if let Some(raw) = lookup(CONCURRENCY_ENV) {
            self.pipeline.concurrency = raw.parse().map_err(|_| {
                CleanerError::Config(format!("{} must be a positive integer, got '{}'", CONCURRENCY_ENV, raw))
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.mar.max_attempts == 0 {
            return Err(CleanerError::Config("mar.max_attempts must be at least 1".to_string()));
        }
        if self.pipeline.concurrency == 0 {
            return Err(CleanerError::Config("pipeline.concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = Config::from_toml_str("[mar]\ntimeout_seconds = 5\n").unwrap();

        assert_eq!(config.mar.timeout_seconds, 5);
        assert_eq!(config.mar.max_attempts, 3);
        assert_eq!(config.mar.initial_backoff_ms, 500);
        assert_eq!(config.mar.base_url, DEFAULT_MAR_URL);
        assert_eq!(config.pipeline.concurrency, 8);
        assert_eq!(config.pipeline.meta_path, PathBuf::from("meta.json"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            (MAR_URL_ENV, "http://localhost:9000"),
            (CONCURRENCY_ENV, "2"),
        ]
        .into_iter()
        .collect();

        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.mar.base_url, "http://localhost:9000");
        assert_eq!(config.pipeline.concurrency, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_toml_str("[mar]\nmax_attempts = 0\n").is_err());

        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == CONCURRENCY_ENV).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, CleanerError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[pipeline]\noutput_dir = \"out\"\nconcurrency = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pipeline.output_dir, PathBuf::from("out"));

        assert!(Config::load_from(dir.path().join("missing.toml")).is_err());
    }
}
