//! Endpoint settings for the imagery and inference collaborators.

use crate::detector::classification::FireLabel;
use serde::Deserialize;

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_class_labels() -> Vec<FireLabel> {
    // CAM satellite model output order: index 0 = No Fire, index 1 = Fire
    vec![FireLabel::NoFire, FireLabel::Fire]
}

/// Satellite imagery tile service settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageryConfig {
    /// Base URL of the tile service
    #[serde(default)]
    pub base_url: String,
    /// Bearer token; imagery is reported unavailable when empty
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl ImageryConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.token.is_empty()
    }
}

/// Remote inference endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of the inference service (`/predict` and `/health` routes)
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    /// Class-index to label mapping in model output order
    #[serde(default = "default_class_labels")]
    pub class_labels: Vec<FireLabel>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_http_timeout_secs(),
            class_labels: default_class_labels(),
        }
    }
}
