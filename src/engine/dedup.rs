//! Suppresses repeat notifications of alerts inside a severity-dependent
//! cooldown window.

use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, Utc};

use crate::models::AlertCandidate;

/// Applies cooldown-based deduplication to active alert candidates.
pub struct AlertDeduplicator {
    /// Mapping entries older than this are pruned on every pass.
    max_alert_age: Duration,
}

impl AlertDeduplicator {
    /// Creates a deduplicator that prunes mapping entries older than
    /// `max_alert_age`.
    pub fn new(max_alert_age: Duration) -> Self {
        Self { max_alert_age }
    }

    /// Selects which candidates to notify and produces the updated mapping.
    ///
    /// A candidate is notified iff its stable id is absent from `known` or
    /// its severity cooldown has elapsed since the stored time. Every
    /// notified id is stamped with `now` in the returned mapping; all other
    /// entries are carried forward unchanged, except entries older than the
    /// maximum alert age, which are dropped.
    ///
    /// The caller is expected to persist the returned mapping whenever at
    /// least one candidate was notified (at-least-once durability: a crash
    /// between notify and persist re-notifies, never misses).
    pub fn filter_and_update(
        &self,
        candidates: &[AlertCandidate],
        known: &HashMap<String, DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> (Vec<AlertCandidate>, HashMap<String, DateTime<Utc>>) {
        let mut updated: HashMap<String, DateTime<Utc>> = known
            .iter()
            .filter(|(_, notified_at)| now < **notified_at + self.max_alert_age)
            .map(|(id, notified_at)| (id.clone(), *notified_at))
            .collect();

        let mut to_notify = Vec::new();
        for candidate in candidates {
            let id = candidate.stable_id();
            let due = match updated.get(&id) {
                None => true,
                Some(notified_at) => now >= *notified_at + candidate.severity.cooldown(),
            };
            if due {
                tracing::info!(
                    %id,
                    event = %candidate.event,
                    severity = ?candidate.severity,
                    "Alert due for notification."
                );
                updated.insert(id, now);
                to_notify.push(candidate.clone());
            } else {
                tracing::debug!(%id, "Alert inside cooldown window, suppressed.");
            }
        }

        (to_notify, updated)
    }
}
