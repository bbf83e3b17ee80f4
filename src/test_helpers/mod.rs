//! Builders for test data.
//!
//! Compiled into the library so both unit and integration tests share them.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{
    AlertCandidate, CurrentConditions, DailyEntry, HourlyEntry, Severity, WeatherSnapshot,
};

/// A fixed, arbitrary reference instant used by the builders.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid timestamp")
}

/// Builder for [`WeatherSnapshot`].
pub struct SnapshotBuilder {
    snapshot: WeatherSnapshot,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    /// Creates a builder with clear-sky defaults.
    pub fn new() -> Self {
        Self {
            snapshot: WeatherSnapshot {
                location_name: "Testville".to_string(),
                current: CurrentConditions { temp_c: 20.0, description: "clear sky".to_string() },
                hourly: Vec::new(),
                daily: Vec::new(),
            },
        }
    }

    /// Sets the location name.
    pub fn location(mut self, name: &str) -> Self {
        self.snapshot.location_name = name.to_string();
        self
    }

    /// Sets the current conditions.
    pub fn current(mut self, temp_c: f64, description: &str) -> Self {
        self.snapshot.current =
            CurrentConditions { temp_c, description: description.to_string() };
        self
    }

    /// Appends `count` hourly entries, one hour apart.
    pub fn hourly_run(mut self, count: usize, temp_c: f64, description: &str) -> Self {
        for i in 0..count {
            self.snapshot.hourly.push(HourlyEntry {
                at: base_time() + Duration::hours(i as i64),
                temp_c,
                description: description.to_string(),
            });
        }
        self
    }

    /// Appends `count` daily entries, one day apart.
    pub fn daily_run(mut self, count: usize, min_c: f64, max_c: f64, description: &str) -> Self {
        for i in 0..count {
            self.snapshot.daily.push(DailyEntry {
                at: base_time() + Duration::days(i as i64),
                min_c,
                max_c,
                description: description.to_string(),
            });
        }
        self
    }

    /// Finalizes the snapshot.
    pub fn build(self) -> WeatherSnapshot {
        self.snapshot
    }
}

/// Builder for [`AlertCandidate`].
pub struct AlertBuilder {
    alert: AlertCandidate,
}

impl AlertBuilder {
    /// Creates a builder for an alert with the given event name.
    pub fn new(event: &str) -> Self {
        Self {
            alert: AlertCandidate {
                provider_id: None,
                event: event.to_string(),
                start: base_time(),
                description: String::new(),
                severity: Severity::Unknown,
            },
        }
    }

    /// Sets the provider-supplied id.
    pub fn provider_id(mut self, id: &str) -> Self {
        self.alert.provider_id = Some(id.to_string());
        self
    }

    /// Sets the alert start time.
    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.alert.start = start;
        self
    }

    /// Sets the long-form description.
    pub fn description(mut self, description: &str) -> Self {
        self.alert.description = description.to_string();
        self
    }

    /// Sets the normalized severity.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.alert.severity = severity;
        self
    }

    /// Finalizes the alert.
    pub fn build(self) -> AlertCandidate {
        self.alert
    }
}
