//! Core data models shared across the application.

pub mod alert;
pub mod weather;

pub use alert::{AlertCandidate, Severity};
pub use weather::{CurrentConditions, DailyEntry, HourlyEntry, WeatherSnapshot};
