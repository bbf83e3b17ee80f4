//! End-to-end alert flow: dedup policy against the persisted mapping format,
//! through the public API.

use std::{collections::HashMap, time::Duration};

use chrono::Duration as ChronoDuration;
use skywatch::{
    engine::AlertDeduplicator,
    models::Severity,
    persistence::{JsonFileAlertStore, traits::AlertStore},
    summary::alert_summary,
    test_helpers::{AlertBuilder, base_time},
    transport::split_message,
};

const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[tokio::test]
async fn notify_persist_restart_suppress_renotify() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlertStore::new(dir.path().join("alerts.json"));
    let dedup = AlertDeduplicator::new(WEEK);

    let alert = AlertBuilder::new("Tornado Warning")
        .severity(Severity::Extreme)
        .description("Take shelter now.")
        .build();

    // First sighting notifies and is persisted.
    let t0 = base_time();
    let (to_notify, updated) = dedup.filter_and_update(&[alert.clone()], &HashMap::new(), t0);
    assert_eq!(to_notify.len(), 1);
    store.save(&updated).await.unwrap();

    // A "restarted" process reloads the mapping; inside the 300s Extreme
    // cooldown the same alert is suppressed.
    let known = store.load().await.unwrap();
    let t1 = t0 + ChronoDuration::seconds(200);
    let (to_notify, _) = dedup.filter_and_update(&[alert.clone()], &known, t1);
    assert!(to_notify.is_empty());

    // Past the cooldown it is notified again.
    let t2 = t0 + ChronoDuration::seconds(301);
    let (to_notify, updated) = dedup.filter_and_update(&[alert.clone()], &known, t2);
    assert_eq!(to_notify.len(), 1);
    assert_eq!(updated.get(&alert.stable_id()), Some(&t2));
}

#[test]
fn notified_alert_formats_and_chunks_for_the_mesh() {
    let alert = AlertBuilder::new("Severe Thunderstorm Warning")
        .severity(Severity::Severe)
        .description(
            "Damaging winds up to 70 mph and quarter size hail expected. \
             Move to an interior room on the lowest floor of a building.",
        )
        .build();

    let chunks = split_message(&alert_summary(&alert), 80);

    assert!(chunks.len() > 1);
    let total = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        assert!(chunk.starts_with(&format!("({}/{}) ", i + 1, total)));
    }
    assert!(chunks[0].contains("Severe Thunderstorm Warning"));
}
