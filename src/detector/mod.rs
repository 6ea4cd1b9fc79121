//! Fire classification boundary: the classifier trait, the detection gate
//! and the remote inference client.

pub mod classification;
pub mod gate;
pub mod remote;

use crate::imagery::ZoneImage;
use async_trait::async_trait;
use thiserror::Error;

pub use classification::{ClassificationVector, ClassifierOutput, FireLabel};
pub use gate::{Classification, DetectionGate, DetectionResult};
pub use remote::RemoteClassifier;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier not available: {0}")]
    Unavailable(String),
    #[error("Inference request failed: {0}")]
    Request(String),
    #[error("Malformed classifier output: {0}")]
    MalformedOutput(String),
}

/// Image classifier collaborator.
///
/// Implementations normalize whatever shape the underlying model produces
/// (single vector or attention/classification pair) before returning.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn predict(&self, image: &ZoneImage) -> Result<ClassificationVector, ClassifierError>;

    async fn is_available(&self) -> bool;
}
