//! Formats canonical weather data into human-readable mesh messages.
//!
//! This layer has no error path of its own; it is only invoked on a snapshot
//! that was fetched successfully.

use crate::models::{AlertCandidate, WeatherSnapshot};

/// Emoji shown when a condition description has no table entry.
const UNKNOWN_CONDITION: &str = "🌡️";

/// Which view of a snapshot to format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastView {
    /// Conditions at fetch time.
    Current,
    /// The next five hours.
    Hourly,
    /// The next five days, with min-max ranges.
    Daily,
}

/// All views, in the order they are pushed on a routine tick.
pub const ROUTINE_VIEWS: [ForecastView; 3] =
    [ForecastView::Current, ForecastView::Hourly, ForecastView::Daily];

/// Converts Celsius to a whole-degree Fahrenheit display value.
///
/// Rounds to the nearest integer, ties away from zero.
pub fn celsius_to_fahrenheit(temp_c: f64) -> i64 {
    (temp_c * 9.0 / 5.0 + 32.0).round() as i64
}

/// Maps a condition description to a display emoji.
fn condition_emoji(description: &str) -> &'static str {
    match description.to_lowercase().as_str() {
        "clear sky" => "☀️",
        "few clouds" => "🌤️",
        "scattered clouds" => "🌥️",
        "broken clouds" | "overcast clouds" => "☁️",
        "light rain" | "drizzle" => "🌦️",
        "moderate rain" | "heavy intensity rain" => "🌧️",
        "thunderstorm" => "⛈️",
        "snow" => "❄️",
        "mist" | "fog" | "haze" => "🌫️",
        _ => UNKNOWN_CONDITION,
    }
}

/// Prefixes a condition description with its emoji.
fn describe(description: &str) -> String {
    format!("{} {}", condition_emoji(description), description)
}

/// Formats the requested view of a snapshot as one message.
pub fn summarize(snapshot: &WeatherSnapshot, view: ForecastView) -> String {
    match view {
        ForecastView::Current => current_summary(snapshot),
        ForecastView::Hourly => hourly_summary(snapshot),
        ForecastView::Daily => daily_summary(snapshot),
    }
}

fn current_summary(snapshot: &WeatherSnapshot) -> String {
    format!(
        "Current weather in {}: {}, {}°F",
        snapshot.location_name,
        describe(&snapshot.current.description),
        celsius_to_fahrenheit(snapshot.current.temp_c)
    )
}

fn hourly_summary(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::from("Next 5 hours:");
    for hour in snapshot.hourly.iter().take(5) {
        out.push_str(&format!(
            "\n{}: {}, {}°F",
            hour.at.format("%I %p"),
            describe(&hour.description),
            celsius_to_fahrenheit(hour.temp_c)
        ));
    }
    out
}

fn daily_summary(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::from("5-day forecast:");
    for day in snapshot.daily.iter().take(5) {
        out.push_str(&format!(
            "\n{}: {}, {}-{}°F",
            day.at.format("%a"),
            describe(&day.description),
            celsius_to_fahrenheit(day.min_c),
            celsius_to_fahrenheit(day.max_c)
        ));
    }
    out
}

/// Formats a surviving alert as one message.
pub fn alert_summary(alert: &AlertCandidate) -> String {
    let description =
        if alert.description.is_empty() { "No details." } else { alert.description.as_str() };
    format!("⚠️ {}: {}", alert.event, description)
}
