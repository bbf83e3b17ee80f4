//! The interface for fetching weather data and active hazard alerts.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::{AlertCandidate, WeatherSnapshot};

/// Errors raised while fetching from a weather provider.
///
/// All of these are contained at the call site: the scheduler logs the error
/// and skips the tick, it never retries within the tick or crashes.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request failed after any transient retries.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The provider answered with an error status or an undecodable body.
    #[error("Provider response error: {0}")]
    Response(#[from] reqwest::Error),

    /// The configured location could not be resolved to coordinates.
    #[error("Location {0:?} could not be geocoded")]
    UnknownLocation(String),
}

/// A source of weather snapshots and active alerts for one fixed location.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherDataSource: Send + Sync {
    /// Fetches current conditions plus hourly and daily forecasts.
    async fn fetch_forecast(&self) -> Result<WeatherSnapshot, FetchError>;

    /// Fetches the alerts currently active for the location.
    async fn fetch_active_alerts(&self) -> Result<Vec<AlertCandidate>, FetchError>;
}
