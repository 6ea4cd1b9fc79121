//! Imagery acquisition boundary.
//!
//! The orchestrator never talks to a tile service directly; it goes through
//! the [`ImagerySource`] trait so scan cycles can run against the real
//! Sentinel-Hub-style HTTP service or an in-test mock.

pub mod sentinel;

use crate::config::Zone;
use async_trait::async_trait;
use thiserror::Error;

pub use sentinel::SentinelImagerySource;

/// Raw image bytes for one zone tile or one stream frame.
#[derive(Debug, Clone)]
pub struct ZoneImage {
    pub bytes: Vec<u8>,
}

impl ZoneImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[derive(Debug, Error)]
pub enum ImageryError {
    #[error("Imagery source not configured: {0}")]
    Unavailable(String),
    #[error("Imagery request failed: {0}")]
    Request(String),
    #[error("No image data received for zone {0}")]
    EmptyImage(String),
}

/// Source of satellite imagery for monitored zones.
#[async_trait]
pub trait ImagerySource: Send + Sync {
    /// Fetch the current tile for a zone's bounding box.
    async fn fetch(&self, zone: &Zone) -> Result<ZoneImage, ImageryError>;

    /// Whether the source has usable credentials/connectivity.
    async fn is_available(&self) -> bool;
}
