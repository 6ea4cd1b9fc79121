//! Cooldown-gated, best-effort broadcast of detection events.

use super::event::AlertEvent;
use super::notifier::{Notifier, SendResult};
use super::spread::{estimated_brightness, ConfidenceBucket, SpreadEstimator};
use crate::detector::DetectionResult;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{info, warn};

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Dropped inside the cooldown window. Deliberate alert-storm
    /// suppression, not an error.
    Suppressed { since_last: Duration },
    /// Fan-out ran; per-channel results in registration order.
    Delivered(Vec<(String, SendResult)>),
}

impl DispatchOutcome {
    pub fn was_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered(_))
    }
}

/// Fans qualifying detections out to every registered notifier, throttled
/// by a single cooldown shared across all callers of this instance.
///
/// The cooldown is global, not per-zone: simultaneous fires in different
/// zones suppress all but the first alert within the window. This mirrors
/// how field deployments ran and is a deliberate choice.
pub struct AlertDispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
    spread: Arc<dyn SpreadEstimator>,
    cooldown: Duration,
    notifier_timeout: Duration,
    /// Check-then-set happens under one guard; a split read/write would
    /// race between the timer task, manual scans and the stream detector.
    last_alert: Mutex<Option<Instant>>,
}

impl AlertDispatcher {
    pub fn new(
        notifiers: Vec<Arc<dyn Notifier>>,
        spread: Arc<dyn SpreadEstimator>,
        cooldown: Duration,
        notifier_timeout: Duration,
    ) -> Self {
        Self {
            notifiers,
            spread,
            cooldown,
            notifier_timeout,
            last_alert: Mutex::new(None),
        }
    }

    pub fn notifier_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    pub fn has_notifiers(&self) -> bool {
        !self.notifiers.is_empty()
    }

    /// Dispatch one detection: cooldown gate, enrichment, then concurrent
    /// best-effort fan-out. One slow or failing channel never blocks the
    /// others beyond its own timeout.
    pub async fn dispatch(&self, result: &DetectionResult) -> DispatchOutcome {
        let now = Instant::now();

        {
            let mut last_alert = self.last_alert.lock().await;
            if let Some(last) = *last_alert {
                let since_last = now.duration_since(last);
                if since_last < self.cooldown {
                    info!(
                        zone = %result.zone,
                        since_last_secs = since_last.as_secs_f64(),
                        "Alert suppressed inside cooldown window"
                    );
                    return DispatchOutcome::Suppressed { since_last };
                }
            }
            *last_alert = Some(now);
        }

        let event = self.enrich(result.clone());
        info!(
            zone = %event.result.zone,
            confidence = event.result.confidence,
            channels = self.notifiers.len(),
            "Dispatching fire alert"
        );

        let sends = self.notifiers.iter().map(|notifier| {
            let event = &event;
            async move {
                let name = notifier.name().to_string();
                let result = match timeout(self.notifier_timeout, notifier.send(event)).await {
                    Ok(Ok(send_result)) => send_result,
                    Ok(Err(e)) => {
                        warn!(channel = %name, error = %e, "Notifier send failed");
                        SendResult::Failed(e.to_string())
                    }
                    Err(_) => {
                        warn!(channel = %name, "Notifier send timed out");
                        SendResult::Failed("send timed out".to_string())
                    }
                };
                (name, result)
            }
        });

        DispatchOutcome::Delivered(join_all(sends).await)
    }

    /// Fill the enrichment fields on a copy of the detection.
    fn enrich(&self, mut result: DetectionResult) -> AlertEvent {
        let brightness = estimated_brightness(result.confidence);
        let bucket = ConfidenceBucket::from_confidence(result.confidence);
        let radius = self.spread.estimate(brightness, bucket);

        result.brightness_kelvin = Some((brightness * 10.0).round() / 10.0);
        result.spread_radius_km = Some(radius);
        AlertEvent::new(result)
    }
}
