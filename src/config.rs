//! Client configuration.
//!
//! All knobs carry the documented defaults, so a config is usually just
//! a base URL. Serde-deserializable (JSON) for file-based deployment
//! configs; every field can also be set in code.

use crate::backoff::{Backoff, BackoffError};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The base URL is not an absolute URL.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// The retry settings describe an impossible backoff schedule.
    #[error("invalid retry settings: {0}")]
    InvalidRetry(#[from] BackoffError),
    /// The HTTP transport could not be initialized.
    #[error("failed to initialize HTTP transport: {0}")]
    Transport(String),
}

/// Retry knobs, in wire-friendly integer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrySettings {
    /// Retries on top of the initial attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// First retry delay, milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Delay growth cap, milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl RetrySettings {
    /// Build the runtime policy these settings describe.
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let backoff = Backoff::exponential(Duration::from_millis(self.base_delay_ms))
            .with_max(Duration::from_millis(self.max_delay_ms))?;
        Ok(RetryPolicy::builder().max_retries(self.max_retries).backoff(backoff).build())
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Session-monitor knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSettings {
    /// Seconds between credential checks.
    #[serde(default = "default_period_secs")]
    pub period_secs: u64,
    /// Seconds before `exp` at which a credential is already retired.
    #[serde(default = "default_buffer_secs")]
    pub buffer_secs: u64,
}

impl MonitorSettings {
    /// Check period as a duration.
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    /// Expiry buffer as a duration.
    pub fn buffer(&self) -> Duration {
        Duration::from_secs(self.buffer_secs)
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self { period_secs: default_period_secs(), buffer_secs: default_buffer_secs() }
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Backend base URL.
    pub base_url: Url,
    /// Per-attempt request deadline, milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retry policy knobs.
    #[serde(default)]
    pub retry: RetrySettings,
    /// Session-monitor knobs.
    #[serde(default)]
    pub monitor: MonitorSettings,
}

impl ClientConfig {
    /// Config with all defaults against the given base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout_ms: default_timeout_ms(),
            retry: RetrySettings::default(),
            monitor: MonitorSettings::default(),
        })
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Per-attempt deadline as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_max_retries() -> usize {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_period_secs() -> u64 {
    5 * 60
}

fn default_buffer_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = ClientConfig::new("http://localhost:3002").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.retry.max_delay_ms, 10_000);
        assert_eq!(config.monitor.period(), Duration::from_secs(300));
        assert_eq!(config.monitor.buffer(), Duration::from_secs(60));
    }

    #[test]
    fn rejects_relative_base_url() {
        assert!(matches!(ClientConfig::new("not a url"), Err(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"baseUrl": "https://api.example.test", "retry": {"maxRetries": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.monitor, MonitorSettings::default());
    }

    #[test]
    fn retry_settings_build_a_policy() {
        let settings =
            RetrySettings { max_retries: 2, base_delay_ms: 100, max_delay_ms: 1000 };
        let policy = settings.to_policy().unwrap();
        assert_eq!(policy.max_retries(), 2);
    }

    #[test]
    fn impossible_backoff_is_rejected() {
        let settings =
            RetrySettings { max_retries: 2, base_delay_ms: 5000, max_delay_ms: 100 };
        assert!(matches!(settings.to_policy(), Err(ConfigError::InvalidRetry(_))));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ClientConfig::new("https://api.example.test/").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.base_url, config.base_url);
        assert_eq!(back.retry, config.retry);
    }
}
