//! Spread radius estimation collaborator and confidence bucketing.

use serde::{Deserialize, Serialize};

/// Brightness band used when the classifier has no radiometric output.
const BRIGHTNESS_MIN_K: f64 = 320.0;
const BRIGHTNESS_MAX_K: f64 = 400.0;

/// Coarse confidence bucket fed to the spread estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBucket {
    High,
    Low,
}

impl ConfidenceBucket {
    /// High iff confidence is strictly above 0.85.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.85 {
            ConfidenceBucket::High
        } else {
            ConfidenceBucket::Low
        }
    }
}

/// Estimates a spread radius from fire brightness and the confidence bucket.
pub trait SpreadEstimator: Send + Sync {
    /// Returns the estimated spread radius in km.
    fn estimate(&self, brightness_kelvin: f64, bucket: ConfidenceBucket) -> f64;
}

/// Map a detection confidence into the 320–400 K brightness band.
///
/// The CAM classifier exposes no radiometric temperature, so the brightness
/// estimate is derived from confidence instead of measured.
pub fn estimated_brightness(confidence: f64) -> f64 {
    let clamped = confidence.clamp(0.0, 1.0);
    BRIGHTNESS_MIN_K + clamped * (BRIGHTNESS_MAX_K - BRIGHTNESS_MIN_K)
}

/// Default heuristic: radius grows linearly across the brightness band,
/// scaled up for high-confidence detections.
pub struct HeuristicSpreadEstimator {
    /// Radius in km at the bottom of the brightness band
    pub base_radius_km: f64,
    /// Additional km across the full brightness band
    pub brightness_span_km: f64,
}

impl Default for HeuristicSpreadEstimator {
    fn default() -> Self {
        Self {
            base_radius_km: 1.0,
            brightness_span_km: 4.0,
        }
    }
}

impl SpreadEstimator for HeuristicSpreadEstimator {
    fn estimate(&self, brightness_kelvin: f64, bucket: ConfidenceBucket) -> f64 {
        let band_position = ((brightness_kelvin - BRIGHTNESS_MIN_K)
            / (BRIGHTNESS_MAX_K - BRIGHTNESS_MIN_K))
            .clamp(0.0, 1.0);
        let radius = self.base_radius_km + band_position * self.brightness_span_km;

        let factor = match bucket {
            ConfidenceBucket::High => 1.5,
            ConfidenceBucket::Low => 1.0,
        };

        // One-decimal precision, matching the alert formatting
        (radius * factor * 10.0).round() / 10.0
    }
}
