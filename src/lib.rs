#![warn(missing_docs)]
//! Skywatch fetches weather conditions and hazard alerts for a fixed location
//! and relays human-readable summaries over a local packet-radio mesh,
//! deduplicating repeat alerts and adapting its polling cadence to severity.

pub mod config;
pub mod connectivity;
pub mod engine;
pub mod http_client;
pub mod models;
pub mod persistence;
pub mod providers;
pub mod summary;
pub mod test_helpers;
pub mod transport;
