//! Integration tests for the persistence layer

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use skywatch::persistence::{JsonFileAlertStore, traits::AlertStore};

#[tokio::test]
async fn missing_file_loads_as_empty_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlertStore::new(dir.path().join("alerts.json"));

    let known = store.load().await.unwrap();
    assert!(known.is_empty());
}

#[tokio::test]
async fn saved_mapping_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlertStore::new(dir.path().join("alerts.json"));

    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let known = HashMap::from([
        ("tornado warning:1700000000".to_string(), at),
        ("flood watch:1699990000".to_string(), at),
    ]);
    store.save(&known).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, known);
}

#[tokio::test]
async fn save_rewrites_the_whole_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlertStore::new(dir.path().join("alerts.json"));

    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    store.save(&HashMap::from([("old".to_string(), at)])).await.unwrap();
    store.save(&HashMap::from([("new".to_string(), at)])).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains_key("new"));
}

#[tokio::test]
async fn on_disk_format_is_id_to_epoch_seconds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alerts.json");
    let store = JsonFileAlertStore::new(&path);

    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    store.save(&HashMap::from([("some-alert".to_string(), at)])).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["some-alert"], serde_json::json!(1_700_000_000));
}

#[tokio::test]
async fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlertStore::new(dir.path().join("data/nested/alerts.json"));

    store.save(&HashMap::new()).await.unwrap();
    assert!(store.load().await.unwrap().is_empty());
}
