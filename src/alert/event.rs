//! Enriched alert event handed to notifier channels.

use crate::detector::DetectionResult;
use serde::{Deserialize, Serialize};

/// A qualifying detection after enrichment, ready for fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub result: DetectionResult,
}

impl AlertEvent {
    pub fn new(result: DetectionResult) -> Self {
        Self { result }
    }

    /// Google Maps link for the detection coordinates, if known.
    pub fn maps_link(&self) -> Option<String> {
        self.result.coordinates.map(|(lat, lon)| {
            format!("https://www.google.com/maps/search/?api=1&query={},{}", lat, lon)
        })
    }

    /// One-line alert headline for subjects and captions.
    pub fn headline(&self) -> String {
        format!(
            "🔥 FIRE DETECTED in {} ({:.1}% confidence)",
            self.result.zone,
            self.result.confidence * 100.0
        )
    }

    /// Multi-line alert body with location, analysis and spread estimate.
    pub fn body(&self) -> String {
        let mut lines = vec![self.headline(), String::new()];

        if let Some((lat, lon)) = self.result.coordinates {
            lines.push(format!("Region: {}", self.result.zone));
            lines.push(format!("Lat/Lon: {:.4}, {:.4}", lat, lon));
        } else {
            lines.push(format!("Source: {}", self.result.zone));
        }

        lines.push(format!("Prediction: {}", self.result.label));
        lines.push(format!("Confidence: {:.1}%", self.result.confidence * 100.0));

        if let Some(brightness) = self.result.brightness_kelvin {
            lines.push(format!("Brightness (est.): {:.1} K", brightness));
        }
        if let Some(radius) = self.result.spread_radius_km {
            lines.push(format!("Estimated spread radius: {:.1} km", radius));
        }
        if let Some(link) = self.maps_link() {
            lines.push(String::new());
            lines.push(link);
        }

        lines.push(String::new());
        lines.push(format!(
            "Detected at {}",
            self.result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::FireLabel;
    use chrono::Utc;

    fn event(coordinates: Option<(f64, f64)>) -> AlertEvent {
        AlertEvent::new(DetectionResult {
            zone: "Atlas".to_string(),
            label: FireLabel::Fire,
            confidence: 0.92,
            raw_scores: vec![(FireLabel::NoFire, 0.08), (FireLabel::Fire, 0.92)],
            coordinates,
            timestamp: Utc::now(),
            brightness_kelvin: Some(355.2),
            spread_radius_km: Some(4.5),
            image: None,
        })
    }

    #[test]
    fn test_headline_includes_zone_and_confidence() {
        let headline = event(Some((31.0, -7.0))).headline();
        assert!(headline.contains("Atlas"));
        assert!(headline.contains("92.0%"));
    }

    #[test]
    fn test_body_includes_enrichment_and_maps_link() {
        let body = event(Some((31.0, -7.0))).body();
        assert!(body.contains("355.2 K"));
        assert!(body.contains("4.5 km"));
        assert!(body.contains("query=31,-7"));
    }

    #[test]
    fn test_no_maps_link_without_coordinates() {
        let event = event(None);
        assert!(event.maps_link().is_none());
        assert!(!event.body().contains("google.com"));
    }
}
