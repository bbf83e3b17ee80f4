//! A whole-file JSON implementation of [`AlertStore`].

use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::persistence::{error::PersistenceError, traits::AlertStore};

/// Stores the alert mapping as a JSON object of id to epoch seconds.
///
/// Writes go to a sibling temp file first and are moved into place, so a
/// crash mid-write never truncates the previous mapping.
pub struct JsonFileAlertStore {
    path: PathBuf,
}

impl JsonFileAlertStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone();
        path.set_extension("json.tmp");
        path
    }
}

#[async_trait]
impl AlertStore for JsonFileAlertStore {
    async fn load(&self) -> Result<HashMap<String, DateTime<Utc>>, PersistenceError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No alert mapping on disk, starting empty.");
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let stored: HashMap<String, i64> = serde_json::from_slice(&raw)?;
        let mut known = HashMap::with_capacity(stored.len());
        for (id, secs) in stored {
            match DateTime::from_timestamp(secs, 0) {
                Some(at) => {
                    known.insert(id, at);
                }
                None => {
                    tracing::warn!(%id, secs, "Discarding alert entry with out-of-range timestamp.");
                }
            }
        }
        Ok(known)
    }

    async fn save(
        &self,
        known: &HashMap<String, DateTime<Utc>>,
    ) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let stored: HashMap<&String, i64> =
            known.iter().map(|(id, at)| (id, at.timestamp())).collect();
        let raw = serde_json::to_vec(&stored)?;

        let temp = self.temp_path();
        fs::write(&temp, &raw).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}
