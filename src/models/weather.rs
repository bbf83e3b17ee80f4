//! The canonical, provider-independent weather data shape.
//!
//! Provider adapters map their payloads into these types; everything past the
//! provider boundary (summaries, the scheduler) only ever sees this shape.
//! Temperatures are stored in Celsius and converted for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single fetched view of current conditions plus short-range forecasts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    /// Human-readable name of the location the snapshot covers.
    pub location_name: String,

    /// Conditions at fetch time.
    pub current: CurrentConditions,

    /// Hourly forecast entries, in provider order (soonest first).
    pub hourly: Vec<HourlyEntry>,

    /// Daily forecast entries, in provider order (today first).
    pub daily: Vec<DailyEntry>,
}

/// Current conditions at the configured location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in degrees Celsius.
    pub temp_c: f64,

    /// Free-text condition description, e.g. "light rain".
    pub description: String,
}

/// One hour of forecast data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyEntry {
    /// Start of the forecast hour.
    pub at: DateTime<Utc>,

    /// Forecast temperature in degrees Celsius.
    pub temp_c: f64,

    /// Free-text condition description.
    pub description: String,
}

/// One day of forecast data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyEntry {
    /// The forecast day.
    pub at: DateTime<Utc>,

    /// Daily minimum temperature in degrees Celsius.
    pub min_c: f64,

    /// Daily maximum temperature in degrees Celsius.
    pub max_c: f64,

    /// Free-text condition description.
    pub description: String,
}
