//! Sentinel-Hub-style HTTP tile source.

use super::{ImageryError, ImagerySource, ZoneImage};
use crate::config::{ImageryConfig, Zone};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Tile request body understood by the imagery service.
#[derive(Debug, Serialize)]
struct TileRequest {
    /// [lon_min, lat_min, lon_max, lat_max]
    bbox: [f64; 4],
    width: u32,
    height: u32,
    format: &'static str,
}

/// Fetches true-color tiles for zone bounding boxes over HTTP.
pub struct SentinelImagerySource {
    client: Client,
    config: ImageryConfig,
}

impl SentinelImagerySource {
    pub fn new(config: ImageryConfig) -> Result<Self, ImageryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageryError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImagerySource for SentinelImagerySource {
    async fn fetch(&self, zone: &Zone) -> Result<ZoneImage, ImageryError> {
        if !self.config.is_configured() {
            return Err(ImageryError::Unavailable(
                "imagery base_url/token not set".to_string(),
            ));
        }

        let url = format!("{}/tiles", self.config.base_url.trim_end_matches('/'));
        let request = TileRequest {
            bbox: zone.bbox,
            width: 224,
            height: 224,
            format: "image/png",
        };

        debug!(zone = %zone.name, url = %url, "Fetching zone tile");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ImageryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageryError::Request(format!(
                "tile service returned {} for zone {}",
                response.status(),
                zone.name
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageryError::Request(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ImageryError::EmptyImage(zone.name.clone()));
        }

        Ok(ZoneImage::new(bytes.to_vec()))
    }

    async fn is_available(&self) -> bool {
        self.config.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_source_is_unavailable() {
        let source = SentinelImagerySource::new(ImageryConfig::default()).unwrap();
        assert!(!source.is_available().await);
    }

    #[tokio::test]
    async fn test_fetch_without_credentials_errors() {
        let source = SentinelImagerySource::new(ImageryConfig::default()).unwrap();
        let zone = Zone::new("Atlas", [-8.0, 30.0, -6.0, 32.0]);

        let result = source.fetch(&zone).await;
        assert!(matches!(result, Err(ImageryError::Unavailable(_))));
    }
}
