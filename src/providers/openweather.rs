//! The OpenWeather adapter.
//!
//! Owns all knowledge of the provider's payload shapes and endpoints and maps
//! them into the canonical models. Severity normalization for this provider
//! is keyword-based, since its alert payloads carry no structured severity
//! field; the mapping table lives in [`severity_from_event`] and nowhere
//! else.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::{
    config::AppConfig,
    http_client::create_retryable_http_client,
    models::{AlertCandidate, CurrentConditions, DailyEntry, HourlyEntry, Severity, WeatherSnapshot},
    providers::traits::{FetchError, WeatherDataSource},
};

const GEOCODE_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const ONECALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

// --- Provider payload shapes ---

#[derive(Debug, Deserialize)]
struct GeoEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainPayload {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    name: String,
    weather: Vec<ConditionPayload>,
    main: MainPayload,
}

#[derive(Debug, Deserialize)]
struct HourlyPayload {
    dt: i64,
    temp: f64,
    weather: Vec<ConditionPayload>,
}

#[derive(Debug, Deserialize)]
struct DailyTempPayload {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct DailyPayload {
    dt: i64,
    temp: DailyTempPayload,
    weather: Vec<ConditionPayload>,
}

#[derive(Debug, Deserialize)]
struct AlertPayload {
    event: String,
    start: i64,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OneCallPayload {
    #[serde(default)]
    hourly: Vec<HourlyPayload>,
    #[serde(default)]
    daily: Vec<DailyPayload>,
    #[serde(default)]
    alerts: Vec<AlertPayload>,
}

// --- Mapping into canonical shapes ---

fn first_description(weather: &[ConditionPayload]) -> String {
    weather.first().map(|c| c.description.clone()).unwrap_or_default()
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Normalizes an OpenWeather event name into the severity taxonomy.
fn severity_from_event(event: &str) -> Severity {
    let event = event.to_lowercase();
    if event.contains("tornado") {
        Severity::Extreme
    } else if event.contains("warning") {
        Severity::Severe
    } else if event.contains("watch") {
        Severity::Moderate
    } else if event.contains("advisory") {
        Severity::Minor
    } else {
        Severity::Unknown
    }
}

fn snapshot_from(current: CurrentPayload, onecall: OneCallPayload) -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: current.name,
        current: CurrentConditions {
            temp_c: current.main.temp,
            description: first_description(&current.weather),
        },
        hourly: onecall
            .hourly
            .into_iter()
            .map(|h| HourlyEntry {
                at: timestamp(h.dt),
                temp_c: h.temp,
                description: first_description(&h.weather),
            })
            .collect(),
        daily: onecall
            .daily
            .into_iter()
            .map(|d| DailyEntry {
                at: timestamp(d.dt),
                min_c: d.temp.min,
                max_c: d.temp.max,
                description: first_description(&d.weather),
            })
            .collect(),
    }
}

fn alerts_from(onecall: OneCallPayload) -> Vec<AlertCandidate> {
    onecall
        .alerts
        .into_iter()
        .map(|a| AlertCandidate {
            // OpenWeather alerts carry no stable id; the candidate derives
            // one from event and start.
            provider_id: None,
            severity: severity_from_event(&a.event),
            start: timestamp(a.start),
            description: a.description.unwrap_or_default(),
            event: a.event,
        })
        .collect()
}

/// Weather data source backed by the OpenWeather HTTP API.
pub struct OpenWeatherSource {
    client: ClientWithMiddleware,
    api_key: String,
    location: String,
    coordinates: OnceCell<(f64, f64)>,
}

impl OpenWeatherSource {
    /// Creates a source from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let base_client =
            reqwest::Client::builder().timeout(config.http_timeout_secs).build()?;
        Ok(Self {
            client: create_retryable_http_client(&config.http_retry, base_client),
            api_key: config.api_key.clone(),
            location: config.location.clone(),
            coordinates: OnceCell::new(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let response = self.client.get(url).query(query).send().await?;
        Ok(response.error_for_status()?.json::<T>().await?)
    }

    /// Resolves and caches the coordinates for the configured location.
    async fn coordinates(&self) -> Result<(f64, f64), FetchError> {
        self.coordinates
            .get_or_try_init(|| async {
                let entries: Vec<GeoEntry> = self
                    .get_json(
                        GEOCODE_URL,
                        &[("q", self.location.as_str()), ("limit", "1"), ("appid", &self.api_key)],
                    )
                    .await?;
                let entry = entries
                    .first()
                    .ok_or_else(|| FetchError::UnknownLocation(self.location.clone()))?;
                tracing::debug!(lat = entry.lat, lon = entry.lon, "Geocoded location.");
                Ok((entry.lat, entry.lon))
            })
            .await
            .copied()
    }

    async fn one_call(&self, exclude: &str) -> Result<OneCallPayload, FetchError> {
        let (lat, lon) = self.coordinates().await?;
        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.get_json(
            ONECALL_URL,
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", &self.api_key),
                ("units", "metric"),
                ("exclude", exclude),
            ],
        )
        .await
    }
}

#[async_trait]
impl WeatherDataSource for OpenWeatherSource {
    async fn fetch_forecast(&self) -> Result<WeatherSnapshot, FetchError> {
        let current: CurrentPayload = self
            .get_json(
                CURRENT_URL,
                &[
                    ("q", self.location.as_str()),
                    ("appid", &self.api_key),
                    ("units", "metric"),
                ],
            )
            .await?;
        let onecall = self.one_call("minutely,alerts,current").await?;
        Ok(snapshot_from(current, onecall))
    }

    async fn fetch_active_alerts(&self) -> Result<Vec<AlertCandidate>, FetchError> {
        let onecall = self.one_call("minutely,hourly,daily,current").await?;
        Ok(alerts_from(onecall))
    }
}
