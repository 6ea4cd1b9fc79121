//! Start/stop state machine owning the background scan timer.

use super::scanner::ZoneScanner;
use super::MonitorError;
use crate::history::{HistoryStore, ScanCycleRecord, ZoneScanOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Snapshot returned by `status()`, valid in any state.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringStatus {
    pub running: bool,
    pub interval_hours: f64,
    pub detection_threshold: f64,
    pub imagery_available: bool,
    pub classifier_available: bool,
    pub zones: usize,
    pub recent_scans: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_scan: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan: Option<ScanCycleRecord>,
}

/// Successful `start` outcome: the immediate cycle's record plus the
/// scheduled time of the next one.
#[derive(Debug, Clone)]
pub struct StartReport {
    pub next_scan: DateTime<Utc>,
    pub first_cycle: ScanCycleRecord,
}

/// Mutable scheduler state. All transitions happen under one lock so
/// concurrent `start`/`stop`/`status` callers observe consistent state.
struct MonitorState {
    running: bool,
    interval: Duration,
    threshold: f64,
    next_scan: Option<DateTime<Utc>>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

/// Two-state machine (`Idle` / `Running`) around the zone scanner.
///
/// `stop()` cancels future scheduled cycles only: a cycle already in
/// progress runs to completion and its record still lands in history.
pub struct MonitoringService {
    scanner: Arc<ZoneScanner>,
    history: Arc<HistoryStore>,
    state: Arc<Mutex<MonitorState>>,
}

impl MonitoringService {
    pub fn new(
        scanner: Arc<ZoneScanner>,
        history: Arc<HistoryStore>,
        default_interval: Duration,
        default_threshold: f64,
    ) -> Self {
        Self {
            scanner,
            history,
            state: Arc::new(Mutex::new(MonitorState {
                running: false,
                interval: default_interval,
                threshold: default_threshold,
                next_scan: None,
                shutdown: None,
                task: None,
            })),
        }
    }

    /// Transition `Idle` → `Running`.
    ///
    /// Rejects when collaborators are unavailable or when already running.
    /// On success one cycle has already run (callers get instant feedback)
    /// and the repeating timer is armed.
    pub async fn start(
        &self,
        interval: Duration,
        threshold: f64,
    ) -> Result<StartReport, MonitorError> {
        if interval.is_zero() {
            return Err(MonitorError::Configuration(
                "scan interval must be positive".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        if state.running {
            return Err(MonitorError::AlreadyRunning);
        }

        if !self.scanner.classifier_available().await {
            return Err(MonitorError::Configuration(
                "detection model not available".to_string(),
            ));
        }
        if !self.scanner.imagery_available().await {
            return Err(MonitorError::Configuration(
                "imagery source not available".to_string(),
            ));
        }

        state.interval = interval;
        state.threshold = threshold;

        info!(
            interval_secs = interval.as_secs(),
            threshold, "Starting monitoring"
        );

        // Initial scan runs before start returns
        let first_cycle = self.scanner.run_cycle(threshold).await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let next_scan = Utc::now() + to_chrono(interval);

        state.running = true;
        state.next_scan = Some(next_scan);
        state.shutdown = Some(shutdown_tx);
        state.task = Some(tokio::spawn(Self::timer_loop(
            self.scanner.clone(),
            self.state.clone(),
            interval,
            threshold,
            shutdown_rx,
        )));

        Ok(StartReport {
            next_scan,
            first_cycle,
        })
    }

    /// Transition `Running` → `Idle`. Only future cycles are cancelled;
    /// the shutdown signal is observed between cycles, never mid-cycle.
    pub async fn stop(&self) -> Result<(), MonitorError> {
        let mut state = self.state.lock().await;
        if !state.running {
            return Err(MonitorError::NotRunning);
        }

        if let Some(shutdown) = state.shutdown.take() {
            let _ = shutdown.send(true);
        }
        // Detach rather than abort: an in-flight cycle finishes and its
        // record is still appended.
        state.task.take();
        state.running = false;
        state.next_scan = None;

        info!("Monitoring stopped");
        Ok(())
    }

    /// Current state, collaborator availability and the latest cycle.
    pub async fn status(&self) -> MonitoringStatus {
        let imagery_available = self.scanner.imagery_available().await;
        let classifier_available = self.scanner.classifier_available().await;
        let recent_scans = self.history.len().await;
        let last_scan = self.history.latest().await;

        let state = self.state.lock().await;
        MonitoringStatus {
            running: state.running,
            interval_hours: state.interval.as_secs_f64() / 3600.0,
            detection_threshold: state.threshold,
            imagery_available,
            classifier_available,
            zones: self.scanner.zone_count(),
            recent_scans,
            next_scan: state.next_scan,
            last_scan,
        }
    }

    /// Manual single-zone scan, valid in any state. Collaborator problems
    /// surface in the returned outcome, not as a hard failure.
    pub async fn scan_zone(&self, name: &str) -> Result<ZoneScanOutcome, MonitorError> {
        let zone = self
            .scanner
            .find_zone(name)
            .ok_or_else(|| MonitorError::UnknownZone(name.to_string()))?
            .clone();

        Ok(self.scanner.scan_zone(&zone).await)
    }

    /// Manual full scan, valid in any state; dispatches and records like a
    /// scheduled cycle.
    pub async fn scan_all(&self) -> ScanCycleRecord {
        let threshold = self.state.lock().await.threshold;
        self.scanner.run_cycle(threshold).await
    }

    /// Recent scan cycle records, most-recent-last.
    pub async fn history(&self, limit: usize) -> Vec<ScanCycleRecord> {
        self.history.recent(limit).await
    }

    async fn timer_loop(
        scanner: Arc<ZoneScanner>,
        state: Arc<Mutex<MonitorState>>,
        interval: Duration,
        threshold: f64,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        // The initial cycle already ran inside start(); first tick lands a
        // full interval later.
        let mut timer =
            tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    // The cycle itself runs outside the select race, so a
                    // stop() arriving now cannot interrupt it.
                    let record = scanner.run_cycle(threshold).await;
                    debug!(fires = record.fires_detected, "Scheduled cycle complete");

                    let mut state = state.lock().await;
                    if state.running {
                        state.next_scan = Some(Utc::now() + to_chrono(interval));
                    }
                }
                _ = shutdown_rx.changed() => {
                    debug!("Shutdown signal received between cycles");
                    break;
                }
            }
        }
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero())
}
