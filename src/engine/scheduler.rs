//! The polling loop driving forecast pushes and alert checks.
//!
//! Two independent cadences share one coarse wake tick: the routine forecast
//! push runs on a constant interval, while the alert check interval adapts to
//! the severity of whatever was last notified. There are no timing threads
//! beyond the single loop; each cadence is a due-time comparison against the
//! current tick.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    connectivity,
    engine::dedup::AlertDeduplicator,
    persistence::traits::AlertStore,
    providers::traits::{FetchError, WeatherDataSource},
    summary::{self, ROUTINE_VIEWS},
    transport::{chunker::split_message, traits::TextSender},
};

/// Notice pushed to the mesh when the host loses connectivity.
const DEGRADED_NOTICE: &str = "⚠️ No connection. Skipping update.";

/// In-memory timing state. Not persisted; resets on restart, which makes the
/// first cycle after boot fire both cadences immediately.
#[derive(Debug)]
struct ScheduleState {
    last_weather_check: Option<DateTime<Utc>>,
    last_alert_check: Option<DateTime<Utc>>,
    alert_interval: std::time::Duration,
}

/// The Scheduler service.
///
/// Runs the wake loop, fires the routine and alert ticks when due, and owns
/// the in-memory copy of the notified-alert mapping.
pub struct Scheduler<
    D: WeatherDataSource + ?Sized,
    S: AlertStore + ?Sized,
    T: TextSender + ?Sized,
> {
    /// Shared application configuration.
    config: Arc<AppConfig>,
    /// The weather provider boundary.
    data_source: Arc<D>,
    /// Durable storage for the notified-alert mapping.
    alert_store: Arc<S>,
    /// The mesh send boundary.
    sender: Arc<T>,
    /// Cooldown-based deduplication policy.
    deduplicator: AlertDeduplicator,
    /// Timing state for the two cadences.
    state: ScheduleState,
    /// The notified-alert mapping, authoritative between persists.
    known_alerts: HashMap<String, DateTime<Utc>>,
    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl<D: WeatherDataSource + ?Sized, S: AlertStore + ?Sized, T: TextSender + ?Sized>
    Scheduler<D, S, T>
{
    /// Creates a new Scheduler.
    ///
    /// `known_alerts` is the mapping loaded from the alert store at startup.
    pub fn new(
        config: Arc<AppConfig>,
        data_source: Arc<D>,
        alert_store: Arc<S>,
        sender: Arc<T>,
        known_alerts: HashMap<String, DateTime<Utc>>,
        cancellation_token: CancellationToken,
    ) -> Self {
        let deduplicator = AlertDeduplicator::new(config.max_alert_age_secs);
        let state = ScheduleState {
            last_weather_check: None,
            last_alert_check: None,
            alert_interval: config.default_alert_interval_secs,
        };
        Self {
            config,
            data_source,
            alert_store,
            sender,
            deduplicator,
            state,
            known_alerts,
            cancellation_token,
        }
    }

    /// Starts the long-running service loop.
    pub async fn run(mut self) {
        loop {
            self.cycle(Utc::now()).await;

            let tick_delay = tokio::time::sleep(self.config.tick_interval_secs);
            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Scheduler cancellation signal received, shutting down...");
                    break;
                }

                _ = tick_delay => {}
            }
        }
        tracing::info!("Scheduler has shut down.");
    }

    /// Performs one wake cycle: the connectivity guard, then each due tick.
    async fn cycle(&mut self, now: DateTime<Utc>) {
        tracing::debug!(%now, "Checking schedule...");

        if !connectivity::probe(&self.config.probe_address, self.config.probe_timeout_secs).await
        {
            tracing::warn!(
                probe = %self.config.probe_address,
                "Host appears offline, skipping cycle."
            );
            // Best-effort degraded notice; the sender absorbs its own errors.
            let notice = split_message(DEGRADED_NOTICE, self.config.max_message_len);
            self.sender.send(&notice, self.config.channel_index).await;
            return;
        }

        if self.weather_due(now) {
            if let Err(e) = self.weather_tick().await {
                tracing::error!(error = %e, "Forecast fetch failed, skipping this tick.");
            }
            self.state.last_weather_check = Some(now);
        }

        if self.alert_due(now) {
            if let Err(e) = self.alert_tick(now).await {
                tracing::error!(error = %e, "Alert fetch failed, skipping this tick.");
            }
            self.state.last_alert_check = Some(now);
        }
    }

    fn weather_due(&self, now: DateTime<Utc>) -> bool {
        match self.state.last_weather_check {
            None => true,
            Some(last) => now >= last + self.config.weather_interval_secs,
        }
    }

    fn alert_due(&self, now: DateTime<Utc>) -> bool {
        match self.state.last_alert_check {
            None => true,
            Some(last) => now >= last + self.state.alert_interval,
        }
    }

    /// Fetches the forecast and pushes the current, hourly and daily views.
    async fn weather_tick(&self) -> Result<(), FetchError> {
        tracing::info!("Pushing routine forecast update.");
        let snapshot = self.data_source.fetch_forecast().await?;

        for view in ROUTINE_VIEWS {
            let message = summary::summarize(&snapshot, view);
            let chunks = split_message(&message, self.config.max_message_len);
            self.sender.send(&chunks, self.config.channel_index).await;
        }
        Ok(())
    }

    /// Fetches active alerts, notifies deduplication survivors and adapts the
    /// alert poll interval.
    async fn alert_tick(&mut self, now: DateTime<Utc>) -> Result<(), FetchError> {
        tracing::info!("Checking for alerts...");
        let active = self.data_source.fetch_active_alerts().await?;

        if active.is_empty() {
            self.state.alert_interval = self.config.default_alert_interval_secs;
            tracing::debug!("No active alerts, alert interval at default.");
            return Ok(());
        }

        let (to_notify, updated) =
            self.deduplicator.filter_and_update(&active, &self.known_alerts, now);
        self.known_alerts = updated;

        if to_notify.is_empty() {
            // Everything active is inside its cooldown; keep the current
            // interval.
            return Ok(());
        }

        for alert in &to_notify {
            let message = summary::alert_summary(alert);
            let chunks = split_message(&message, self.config.max_message_len);
            self.sender.send(&chunks, self.config.channel_index).await;
        }

        // Notify first, persist second: a crash in between re-notifies after
        // restart but never misses.
        if let Err(e) = self.alert_store.save(&self.known_alerts).await {
            tracing::error!(
                error = %e,
                "Failed to persist alert mapping, duplicates possible after restart."
            );
        }

        if let Some(interval) = to_notify.iter().map(|a| a.severity.poll_interval()).min() {
            tracing::info!(interval_secs = interval.as_secs(), "Alert interval adapted.");
            self.state.alert_interval = interval;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Duration as ChronoDuration;

    use crate::{
        models::Severity,
        persistence::traits::MockAlertStore,
        providers::traits::MockWeatherDataSource,
        test_helpers::{AlertBuilder, SnapshotBuilder, base_time},
        transport::traits::MockTextSender,
    };

    use super::*;

    struct TestHarness {
        config: AppConfig,
        data_source: MockWeatherDataSource,
        alert_store: MockAlertStore,
        sender: MockTextSender,
        known_alerts: HashMap<String, DateTime<Utc>>,
    }

    impl TestHarness {
        fn new() -> Self {
            Self {
                config: AppConfig::for_test(),
                data_source: MockWeatherDataSource::new(),
                alert_store: MockAlertStore::new(),
                sender: MockTextSender::new(),
                known_alerts: HashMap::new(),
            }
        }

        fn build(self) -> Scheduler<MockWeatherDataSource, MockAlertStore, MockTextSender> {
            Scheduler::new(
                Arc::new(self.config),
                Arc::new(self.data_source),
                Arc::new(self.alert_store),
                Arc::new(self.sender),
                self.known_alerts,
                CancellationToken::new(),
            )
        }
    }

    #[tokio::test]
    async fn weather_tick_pushes_all_three_views() {
        let mut harness = TestHarness::new();
        harness.data_source.expect_fetch_forecast().times(1).returning(|| {
            Ok(SnapshotBuilder::new()
                .hourly_run(5, 15.0, "clear sky")
                .daily_run(5, 10.0, 20.0, "clear sky")
                .build())
        });
        harness.sender.expect_send().times(3).returning(|_, _| ());

        let scheduler = harness.build();
        assert!(scheduler.weather_tick().await.is_ok());
    }

    #[tokio::test]
    async fn weather_tick_propagates_fetch_failure_without_sending() {
        let mut harness = TestHarness::new();
        harness.data_source.expect_fetch_forecast().times(1).returning(|| {
            Err(FetchError::UnknownLocation("Nowhere".to_string()))
        });
        harness.sender.expect_send().times(0);

        let scheduler = harness.build();
        assert!(scheduler.weather_tick().await.is_err());
    }

    #[tokio::test]
    async fn new_alert_is_sent_persisted_and_shortens_the_interval() {
        let mut harness = TestHarness::new();
        let alert = AlertBuilder::new("Tornado Warning").severity(Severity::Extreme).build();
        let id = alert.stable_id();

        harness
            .data_source
            .expect_fetch_active_alerts()
            .times(1)
            .returning(move || Ok(vec![alert.clone()]));
        harness.sender.expect_send().times(1).returning(|_, _| ());
        harness
            .alert_store
            .expect_save()
            .withf(move |known| known.contains_key(&id))
            .times(1)
            .returning(|_| Ok(()));

        let mut scheduler = harness.build();
        let now = base_time();
        assert!(scheduler.alert_tick(now).await.is_ok());

        assert_eq!(scheduler.state.alert_interval, Duration::from_secs(60));
        assert_eq!(scheduler.known_alerts.len(), 1);
    }

    #[tokio::test]
    async fn empty_alert_fetch_resets_the_interval_to_default() {
        let mut harness = TestHarness::new();
        harness.data_source.expect_fetch_active_alerts().times(1).returning(|| Ok(vec![]));
        harness.sender.expect_send().times(0);
        harness.alert_store.expect_save().times(0);

        let mut scheduler = harness.build();
        scheduler.state.alert_interval = Duration::from_secs(60);

        assert!(scheduler.alert_tick(base_time()).await.is_ok());
        assert_eq!(scheduler.state.alert_interval, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn suppressed_alerts_neither_send_nor_persist_nor_adapt() {
        let mut harness = TestHarness::new();
        let alert = AlertBuilder::new("Tornado Warning").severity(Severity::Extreme).build();
        let now = base_time();
        harness.known_alerts.insert(alert.stable_id(), now - ChronoDuration::seconds(100));

        harness
            .data_source
            .expect_fetch_active_alerts()
            .times(1)
            .returning(move || Ok(vec![alert.clone()]));
        harness.sender.expect_send().times(0);
        harness.alert_store.expect_save().times(0);

        let mut scheduler = harness.build();
        scheduler.state.alert_interval = Duration::from_secs(300);

        assert!(scheduler.alert_tick(now).await.is_ok());
        // The interval set by the earlier notification is kept.
        assert_eq!(scheduler.state.alert_interval, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn highest_urgency_among_survivors_wins() {
        let mut harness = TestHarness::new();
        let minor = AlertBuilder::new("Wind Advisory").severity(Severity::Minor).build();
        let severe = AlertBuilder::new("Severe Thunderstorm Warning")
            .severity(Severity::Severe)
            .description("Damaging winds expected.")
            .build();

        harness
            .data_source
            .expect_fetch_active_alerts()
            .times(1)
            .returning(move || Ok(vec![minor.clone(), severe.clone()]));
        harness.sender.expect_send().times(2).returning(|_, _| ());
        harness.alert_store.expect_save().times(1).returning(|_| Ok(()));

        let mut scheduler = harness.build();
        assert!(scheduler.alert_tick(base_time()).await.is_ok());

        assert_eq!(scheduler.state.alert_interval, Severity::Severe.poll_interval());
    }

    #[tokio::test]
    async fn persistence_failure_is_absorbed() {
        let mut harness = TestHarness::new();
        let alert = AlertBuilder::new("Flood Watch").severity(Severity::Moderate).build();

        harness
            .data_source
            .expect_fetch_active_alerts()
            .times(1)
            .returning(move || Ok(vec![alert.clone()]));
        harness.sender.expect_send().times(1).returning(|_, _| ());
        harness.alert_store.expect_save().times(1).returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        });

        let mut scheduler = harness.build();
        assert!(scheduler.alert_tick(base_time()).await.is_ok());
    }

    #[tokio::test]
    async fn offline_host_skips_the_cycle_after_a_degraded_notice() {
        let mut harness = TestHarness::new();
        // Connection refused immediately on loopback port 1.
        harness.config.probe_address = "127.0.0.1:1".to_string();
        harness.data_source.expect_fetch_forecast().times(0);
        harness.data_source.expect_fetch_active_alerts().times(0);
        harness
            .sender
            .expect_send()
            .withf(|chunks, _| chunks.len() == 1 && chunks[0].contains("No connection"))
            .times(1)
            .returning(|_, _| ());

        let mut scheduler = harness.build();
        scheduler.cycle(base_time()).await;
    }

    #[tokio::test]
    async fn both_cadences_fire_on_the_first_cycle() {
        let scheduler = TestHarness::new().build();
        assert!(scheduler.weather_due(base_time()));
        assert!(scheduler.alert_due(base_time()));
    }

    #[tokio::test]
    async fn cadences_fire_only_after_their_intervals() {
        let mut scheduler = TestHarness::new().build();
        let now = base_time();
        scheduler.state.last_weather_check = Some(now);
        scheduler.state.last_alert_check = Some(now);

        let early = now + ChronoDuration::seconds(599);
        assert!(!scheduler.weather_due(early));
        assert!(!scheduler.alert_due(early));

        let due = now + ChronoDuration::seconds(600);
        assert!(scheduler.weather_due(due));
        assert!(scheduler.alert_due(due));
    }
}
