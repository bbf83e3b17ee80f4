//! The storage interface for the notified-alert mapping.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::persistence::error::PersistenceError;

/// Durable storage for the mapping from alert id to last-notified time.
///
/// The mapping is small and rewritten in full; implementations assume a
/// single writer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Loads the mapping. A store that has never been written yields an empty
    /// mapping, not an error.
    async fn load(&self) -> Result<HashMap<String, DateTime<Utc>>, PersistenceError>;

    /// Replaces the stored mapping with `known`.
    async fn save(
        &self,
        known: &HashMap<String, DateTime<Utc>>,
    ) -> Result<(), PersistenceError>;
}
