//! Continuous frame-by-frame fire detection for live video sources.
//!
//! Runs independently of the zone scheduler: frames go through the same
//! detection gate, but alerts flow through the detector's own dispatcher
//! instance, so the stream cooldown never interferes with satellite alerts.

use crate::alert::AlertDispatcher;
use crate::detector::{DetectionGate, DetectionResult};
use crate::imagery::ZoneImage;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pull-based source of video frames. `None` ends the stream.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Option<ZoneImage>;
}

/// Counters for one stream run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub frames: usize,
    pub fires: usize,
    pub alerts_dispatched: usize,
    pub alerts_suppressed: usize,
}

/// Frame-by-frame detector with its own alert throttle.
pub struct StreamDetector {
    /// Source label used as the zone field on detections
    name: String,
    gate: DetectionGate,
    dispatcher: Arc<AlertDispatcher>,
    threshold: f64,
}

impl StreamDetector {
    pub fn new(
        name: impl Into<String>,
        gate: DetectionGate,
        dispatcher: Arc<AlertDispatcher>,
        threshold: f64,
    ) -> Self {
        Self {
            name: name.into(),
            gate,
            dispatcher,
            threshold,
        }
    }

    /// Consume the source until it ends, dispatching qualifying fire frames.
    /// Classification failures skip the frame; the stream keeps running.
    pub async fn run(&self, source: &mut dyn FrameSource) -> StreamSummary {
        let mut summary = StreamSummary::default();

        while let Some(frame) = source.next_frame().await {
            summary.frames += 1;

            let classification = match self.gate.classify(&frame).await {
                Ok(classification) => classification,
                Err(e) => {
                    warn!(stream = %self.name, error = %e, "Frame classification failed");
                    continue;
                }
            };

            if classification.label != crate::detector::FireLabel::Fire {
                continue;
            }
            summary.fires += 1;

            if classification.confidence < self.threshold {
                debug!(
                    stream = %self.name,
                    confidence = classification.confidence,
                    "Fire frame below alert threshold"
                );
                continue;
            }

            let result = DetectionResult {
                zone: self.name.clone(),
                label: classification.label,
                confidence: classification.confidence,
                raw_scores: classification.raw_scores,
                coordinates: None,
                timestamp: Utc::now(),
                brightness_kelvin: None,
                spread_radius_km: None,
                image: Some(frame.bytes.clone()),
            };

            if self.dispatcher.dispatch(&result).await.was_delivered() {
                summary.alerts_dispatched += 1;
            } else {
                summary.alerts_suppressed += 1;
            }
        }

        info!(
            stream = %self.name,
            frames = summary.frames,
            fires = summary.fires,
            dispatched = summary.alerts_dispatched,
            "Stream ended"
        );
        summary
    }
}
