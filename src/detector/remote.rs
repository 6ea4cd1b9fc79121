//! HTTP inference client for a remote model-serving endpoint.

use super::classification::{ClassificationVector, ClassifierOutput};
use super::{Classifier, ClassifierError};
use crate::config::ClassifierConfig;
use crate::imagery::ZoneImage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// `/predict` response. Attention-map models include the auxiliary head;
/// plain models return `scores` alone.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    scores: Vec<f64>,
    #[serde(default)]
    attention: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    model_loaded: bool,
}

/// Classifier backed by an HTTP model-serving endpoint
/// (`POST /predict`, `GET /health`).
pub struct RemoteClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl RemoteClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), route)
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn predict(&self, image: &ZoneImage) -> Result<ClassificationVector, ClassifierError> {
        if self.config.base_url.is_empty() {
            return Err(ClassifierError::Unavailable(
                "classifier base_url not set".to_string(),
            ));
        }

        let part = Part::bytes(image.bytes.clone())
            .file_name("tile.png")
            .mime_str("image/png")
            .map_err(|e| ClassifierError::Request(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("predict"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Request(format!(
                "inference endpoint returned {}",
                response.status()
            )));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedOutput(e.to_string()))?;

        // Normalize the dual/single output shape here so the gate never
        // branches on it.
        let output = match body.attention {
            Some(attention) => {
                debug!(attention_len = attention.len(), "Dual-head model output");
                ClassifierOutput::WithAttention {
                    attention,
                    classification: ClassificationVector::new(body.scores),
                }
            }
            None => ClassifierOutput::Single(ClassificationVector::new(body.scores)),
        };

        Ok(output.into_classification())
    }

    async fn is_available(&self) -> bool {
        if self.config.base_url.is_empty() {
            return false;
        }

        match self.client.get(self.url("health")).send().await {
            Ok(response) => response
                .json::<HealthResponse>()
                .await
                .map(|h| h.model_loaded)
                .unwrap_or(false),
            Err(e) => {
                debug!(error = %e, "Classifier health check failed");
                false
            }
        }
    }
}
