use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{HttpRetryConfig, deserialize_duration_from_seconds};

/// Provides the default value for channel_index.
fn default_channel_index() -> u32 {
    0
}

/// Provides the default value for alerts_file.
fn default_alerts_file() -> PathBuf {
    PathBuf::from("data/alerts.json")
}

/// Provides the default value for radio_address.
fn default_radio_address() -> String {
    "127.0.0.1:4403".to_string()
}

/// Provides the default value for max_message_len.
fn default_max_message_len() -> usize {
    180
}

/// Provides the default value for weather_interval_secs.
fn default_weather_interval() -> Duration {
    Duration::from_secs(10 * 60)
}

/// Provides the default value for default_alert_interval_secs.
fn default_alert_interval() -> Duration {
    Duration::from_secs(10 * 60)
}

/// Provides the default value for tick_interval_secs.
fn default_tick_interval() -> Duration {
    Duration::from_secs(60)
}

/// Provides the default value for probe_address.
fn default_probe_address() -> String {
    "8.8.8.8:53".to_string()
}

/// Provides the default value for probe_timeout_secs.
fn default_probe_timeout() -> Duration {
    Duration::from_secs(3)
}

/// Provides the default value for max_alert_age_secs.
fn default_max_alert_age() -> Duration {
    Duration::from_secs(7 * 24 * 60 * 60)
}

/// Provides the default value for http_timeout_secs.
fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Application configuration for Skywatch.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Location query passed to the weather provider, e.g. "Austin,TX,US".
    pub location: String,

    /// Weather provider API key.
    pub api_key: String,

    /// Mesh channel index to send on.
    #[serde(default = "default_channel_index")]
    pub channel_index: u32,

    /// Path of the persisted alert-id mapping.
    #[serde(default = "default_alerts_file")]
    pub alerts_file: PathBuf,

    /// TCP address of the radio device link.
    #[serde(default = "default_radio_address")]
    pub radio_address: String,

    /// Maximum body length of a single mesh message, in bytes.
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    /// How often to push the routine forecast.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_weather_interval"
    )]
    pub weather_interval_secs: Duration,

    /// Alert poll interval used when no alert is active.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_alert_interval"
    )]
    pub default_alert_interval_secs: Duration,

    /// Wake-up granularity of the scheduler loop.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_tick_interval"
    )]
    pub tick_interval_secs: Duration,

    /// Address probed to decide whether the host has connectivity.
    #[serde(default = "default_probe_address")]
    pub probe_address: String,

    /// Timeout for the connectivity probe.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_probe_timeout"
    )]
    pub probe_timeout_secs: Duration,

    /// Alert-id mapping entries older than this are pruned.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_max_alert_age"
    )]
    pub max_alert_age_secs: Duration,

    /// Per-request timeout for weather provider calls.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_http_timeout"
    )]
    pub http_timeout_secs: Duration,

    /// Retry policy for weather provider calls.
    #[serde(default)]
    pub http_retry: HttpRetryConfig,
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("SKYWATCH").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Creates an `AppConfig` with test defaults, for use by unit tests.
    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            location: "Testville,US".to_string(),
            api_key: "test-key".to_string(),
            channel_index: default_channel_index(),
            alerts_file: default_alerts_file(),
            radio_address: default_radio_address(),
            max_message_len: default_max_message_len(),
            weather_interval_secs: default_weather_interval(),
            default_alert_interval_secs: default_alert_interval(),
            tick_interval_secs: default_tick_interval(),
            probe_address: default_probe_address(),
            probe_timeout_secs: default_probe_timeout(),
            max_alert_age_secs: default_max_alert_age(),
            http_timeout_secs: default_http_timeout(),
            http_retry: HttpRetryConfig::default(),
        }
    }
}
