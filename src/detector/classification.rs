//! Classifier output types and label mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicted class for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireLabel {
    Fire,
    Smoke,
    NoFire,
    /// Class index outside the configured label mapping
    Unknown,
}

impl fmt::Display for FireLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireLabel::Fire => write!(f, "Fire"),
            FireLabel::Smoke => write!(f, "Smoke"),
            FireLabel::NoFire => write!(f, "No Fire"),
            FireLabel::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The single classification shape the detection gate consumes.
///
/// Scores are per-class probabilities in model output order; they are not
/// re-normalized here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationVector {
    pub scores: Vec<f64>,
}

impl ClassificationVector {
    pub fn new(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    /// Index and score of the highest-scoring class, `None` for empty output.
    pub fn arg_max(&self) -> Option<(usize, f64)> {
        self.scores
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(idx, score)| (idx, *score))
    }
}

/// Raw model output as produced by a classifier backend.
///
/// Attention-map models return an auxiliary head alongside the
/// classification head; plain models return the classification vector alone.
/// Either way the orchestrator only ever sees a [`ClassificationVector`] —
/// the collapse happens here, at the collaborator boundary.
#[derive(Debug, Clone)]
pub enum ClassifierOutput {
    Single(ClassificationVector),
    WithAttention {
        #[allow(dead_code)]
        attention: Vec<f64>,
        classification: ClassificationVector,
    },
}

impl ClassifierOutput {
    pub fn into_classification(self) -> ClassificationVector {
        match self {
            ClassifierOutput::Single(classification) => classification,
            ClassifierOutput::WithAttention { classification, .. } => classification,
        }
    }
}
