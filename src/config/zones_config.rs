//! Monitored zone definitions loaded from the YAML config.

use serde::{Deserialize, Serialize};

/// A named geographic region with a fixed bounding box monitored for fire.
///
/// Bounding box order follows the imagery API convention:
/// `[lon_min, lat_min, lon_max, lat_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Unique zone name
    pub name: String,
    /// Bounding box: [lon_min, lat_min, lon_max, lat_max]
    pub bbox: [f64; 4],
}

impl Zone {
    pub fn new(name: impl Into<String>, bbox: [f64; 4]) -> Self {
        Self {
            name: name.into(),
            bbox,
        }
    }

    /// Center of the bounding box as `(lat, lon)`, used for alert coordinates.
    pub fn center(&self) -> (f64, f64) {
        let lat = (self.bbox[1] + self.bbox[3]) / 2.0;
        let lon = (self.bbox[0] + self.bbox[2]) / 2.0;
        (lat, lon)
    }
}
