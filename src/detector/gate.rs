//! Detection gate: turns classifier output into typed detection results.

use super::classification::{ClassificationVector, FireLabel};
use super::{Classifier, ClassifierError};
use crate::config::Zone;
use crate::imagery::ZoneImage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Label, confidence and raw scores for one classified image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: FireLabel,
    /// Arg-max score in [0, 1]
    pub confidence: f64,
    /// Per-class scores in model output order
    pub raw_scores: Vec<(FireLabel, f64)>,
}

/// One zone's outcome within a scan cycle. Immutable once created;
/// enrichment fields are filled on the copy embedded in an alert event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub zone: String,
    pub label: FireLabel,
    pub confidence: f64,
    pub raw_scores: Vec<(FireLabel, f64)>,
    /// Zone center `(lat, lon)`; absent for stream frames
    pub coordinates: Option<(f64, f64)>,
    pub timestamp: DateTime<Utc>,
    /// Estimated fire brightness in Kelvin (set during alert enrichment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_kelvin: Option<f64>,
    /// Estimated spread radius in km (set during alert enrichment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread_radius_km: Option<f64>,
    /// Rendered tile the classification ran on, for alert attachments
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
}

impl DetectionResult {
    pub fn is_fire(&self) -> bool {
        self.label == FireLabel::Fire
    }
}

/// The threshold-side of detection: classifies an image and maps the
/// arg-max class index to a [`FireLabel`].
pub struct DetectionGate {
    classifier: Arc<dyn Classifier>,
    /// Class-index to label mapping in model output order
    labels: Vec<FireLabel>,
}

impl DetectionGate {
    pub fn new(classifier: Arc<dyn Classifier>, labels: Vec<FireLabel>) -> Self {
        Self { classifier, labels }
    }

    pub async fn is_available(&self) -> bool {
        self.classifier.is_available().await
    }

    /// Classify one image. Out-of-range class indices map to
    /// [`FireLabel::Unknown`] rather than erroring.
    pub async fn classify(&self, image: &ZoneImage) -> Result<Classification, ClassifierError> {
        let vector = self.classifier.predict(image).await?;
        let (class_idx, confidence) = vector.arg_max().ok_or_else(|| {
            ClassifierError::MalformedOutput("empty classification vector".to_string())
        })?;

        let label = self
            .labels
            .get(class_idx)
            .copied()
            .unwrap_or(FireLabel::Unknown);

        debug!(%label, confidence, class_idx, "Image classified");

        Ok(Classification {
            label,
            confidence,
            raw_scores: self.raw_scores(&vector),
        })
    }

    /// Classify a zone tile and assemble the full detection result.
    pub async fn predict(
        &self,
        zone: &Zone,
        image: &ZoneImage,
    ) -> Result<DetectionResult, ClassifierError> {
        let classification = self.classify(image).await?;

        Ok(DetectionResult {
            zone: zone.name.clone(),
            label: classification.label,
            confidence: classification.confidence,
            raw_scores: classification.raw_scores,
            coordinates: Some(zone.center()),
            timestamp: Utc::now(),
            brightness_kelvin: None,
            spread_radius_km: None,
            image: Some(image.bytes.clone()),
        })
    }

    fn raw_scores(&self, vector: &ClassificationVector) -> Vec<(FireLabel, f64)> {
        vector
            .scores
            .iter()
            .enumerate()
            .map(|(idx, score)| {
                let label = self.labels.get(idx).copied().unwrap_or(FireLabel::Unknown);
                (label, *score)
            })
            .collect()
    }
}
