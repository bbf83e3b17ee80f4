//! Persistence of the notified-alert mapping.

pub mod error;
pub mod json_file;
pub mod traits;

pub use json_file::JsonFileAlertStore;
