//! Runtime configuration: where the datasets live, how long a fetch may take and
//! how malformed numbers are treated.

use crate::datasets::normalizer::NumericPolicy;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://mewmco8dma0rlvkg.public.blob.vercel-storage.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const BASE_URL_ENV: &str = "BLOB_BASE_URL";
pub const TIMEOUT_ENV: &str = "DASHBOARD_FETCH_TIMEOUT_SECS";
pub const NUMERIC_POLICY_ENV: &str = "DASHBOARD_NUMERIC_POLICY";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Base location the dataset paths are appended to, without a trailing `/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for fetching a single dataset, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub numeric_policy: NumericPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            numeric_policy: NumericPolicy::default(),
        }
    }
}

/// Strips trailing `/` characters; an empty result means "use the default".
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        default_base_url()
    } else {
        trimmed.to_string()
    }
}

impl DashboardConfig {
    /// Reads the configuration from the process environment, loading a `.env`
    /// file first if one exists.
    ///
    /// * `BLOB_BASE_URL`: base location of the datasets.
    /// * `DASHBOARD_FETCH_TIMEOUT_SECS`: positive number of seconds.
    /// * `DASHBOARD_NUMERIC_POLICY`: `lenient` or `strict`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup; unset keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = normalize_base_url(&base_url);
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout_secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: TIMEOUT_ENV,
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    })
                }
            };
        }

        if let Some(raw) = lookup(NUMERIC_POLICY_ENV) {
            config.numeric_policy =
                raw.parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: NUMERIC_POLICY_ENV,
                        value: raw.clone(),
                        reason,
                    })?;
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
