//! Hazard alert models and the severity taxonomy.
//!
//! Severity is a closed, ordered set. Provider adapters are responsible for
//! normalizing whatever taxonomy their source uses into [`Severity`]; the
//! deduplication and scheduling layers never inspect alert text themselves.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized hazard urgency, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Imminent threat to life or property.
    Extreme,
    /// Significant threat.
    Severe,
    /// Possible threat.
    Moderate,
    /// Minimal threat.
    Minor,
    /// The provider supplied no recognizable severity.
    Unknown,
}

impl Severity {
    /// Minimum elapsed time before an already-notified alert id may be
    /// re-notified.
    pub fn cooldown(&self) -> Duration {
        match self {
            Severity::Extreme => Duration::from_secs(5 * 60),
            Severity::Severe => Duration::from_secs(10 * 60),
            Severity::Moderate => Duration::from_secs(30 * 60),
            Severity::Minor | Severity::Unknown => Duration::from_secs(60 * 60),
        }
    }

    /// How soon the scheduler should poll for alerts again while an alert of
    /// this severity is active.
    pub fn poll_interval(&self) -> Duration {
        match self {
            Severity::Extreme => Duration::from_secs(60),
            Severity::Severe => Duration::from_secs(5 * 60),
            Severity::Moderate => Duration::from_secs(15 * 60),
            Severity::Minor => Duration::from_secs(30 * 60),
            Severity::Unknown => Duration::from_secs(10 * 60),
        }
    }
}

/// An active alert as reported by a provider, before deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertCandidate {
    /// Stable provider-supplied identifier, when the provider has one.
    pub provider_id: Option<String>,

    /// Event name, e.g. "Tornado Warning".
    pub event: String,

    /// When the alert period begins.
    pub start: DateTime<Utc>,

    /// Long-form alert text.
    pub description: String,

    /// Normalized severity.
    pub severity: Severity,
}

impl AlertCandidate {
    /// Returns the identifier used for deduplication.
    ///
    /// Uses the provider id verbatim when present. Otherwise derives one from
    /// the normalized event name and the start time; two distinct alerts
    /// sharing both collide, an accepted approximation.
    pub fn stable_id(&self) -> String {
        match &self.provider_id {
            Some(id) => id.clone(),
            None => {
                let event = self.event.to_lowercase();
                let event = event.split_whitespace().collect::<Vec<_>>().join(" ");
                format!("{}:{}", event, self.start.timestamp())
            }
        }
    }
}
