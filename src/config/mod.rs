//! Configuration module for Skywatch.

mod app_config;
mod helpers;
mod http_retry;

pub use app_config::AppConfig;
pub use helpers::{deserialize_duration_from_seconds, serialize_duration_to_seconds};
pub use http_retry::{HttpRetryConfig, JitterSetting};
