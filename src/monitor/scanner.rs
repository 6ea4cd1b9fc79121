//! Full-fleet scan cycles with per-zone failure isolation.

use crate::alert::AlertDispatcher;
use crate::config::Zone;
use crate::detector::DetectionGate;
use crate::history::{
    HistoryStore, ScanCycleRecord, ScanErrorKind, ZoneScanError, ZoneScanOutcome,
};
use crate::imagery::ImagerySource;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs detection over every configured zone and feeds qualifying results
/// to the alert dispatcher.
pub struct ZoneScanner {
    zones: Vec<Zone>,
    imagery: Arc<dyn ImagerySource>,
    gate: DetectionGate,
    dispatcher: Arc<AlertDispatcher>,
    history: Arc<HistoryStore>,
}

impl ZoneScanner {
    pub fn new(
        zones: Vec<Zone>,
        imagery: Arc<dyn ImagerySource>,
        gate: DetectionGate,
        dispatcher: Arc<AlertDispatcher>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            zones,
            imagery,
            gate,
            dispatcher,
            history,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn find_zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name.eq_ignore_ascii_case(name))
    }

    pub async fn imagery_available(&self) -> bool {
        self.imagery.is_available().await
    }

    pub async fn classifier_available(&self) -> bool {
        self.gate.is_available().await
    }

    /// Scan a single zone. Failures come back as recoverable entries, never
    /// as panics or aborts.
    pub async fn scan_zone(&self, zone: &Zone) -> ZoneScanOutcome {
        let image = match self.imagery.fetch(zone).await {
            Ok(image) => image,
            Err(e) => {
                warn!(zone = %zone.name, error = %e, "Imagery acquisition failed");
                return ZoneScanOutcome::Error(ZoneScanError {
                    zone: zone.name.clone(),
                    kind: ScanErrorKind::Acquisition,
                    message: e.to_string(),
                });
            }
        };

        match self.gate.predict(zone, &image).await {
            Ok(result) => ZoneScanOutcome::Detection(result),
            Err(e) => {
                warn!(zone = %zone.name, error = %e, "Classification failed");
                ZoneScanOutcome::Error(ZoneScanError {
                    zone: zone.name.clone(),
                    kind: ScanErrorKind::Classification,
                    message: e.to_string(),
                })
            }
        }
    }

    /// One full pass over all configured zones.
    ///
    /// A single zone's failure never aborts the cycle; one unreachable tile
    /// must not blind the whole fleet. After all zones are processed the
    /// dispatcher is called once per qualifying result, and exactly one
    /// record (successes and failures alike) is appended to history.
    pub async fn run_cycle(&self, threshold: f64) -> ScanCycleRecord {
        info!(zones = self.zones.len(), "Starting full scan");

        let mut outcomes = Vec::with_capacity(self.zones.len());
        for zone in &self.zones {
            outcomes.push(self.scan_zone(zone).await);
        }

        for outcome in &outcomes {
            if let ZoneScanOutcome::Detection(result) = outcome {
                if result.is_fire() && result.confidence >= threshold {
                    let dispatch = self.dispatcher.dispatch(result).await;
                    info!(
                        zone = %result.zone,
                        confidence = result.confidence,
                        delivered = dispatch.was_delivered(),
                        "Fire detection handled"
                    );
                }
            }
        }

        let record = ScanCycleRecord::new(outcomes);
        info!(fires = record.fires_detected, "Scan complete");

        self.history.append(record.clone()).await;
        record
    }
}
