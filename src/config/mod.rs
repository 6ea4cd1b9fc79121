pub mod monitoring_config;
pub mod notifiers_config;
pub mod services_config;
pub mod zones_config;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

pub use monitoring_config::MonitoringConfig;
pub use notifiers_config::{EmailConfig, NotifiersConfig, TelegramConfig};
pub use services_config::{ClassifierConfig, ImageryConfig};
pub use zones_config::Zone;

/// Main configuration structure matching config.yaml format
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Zones scanned on every cycle
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub imagery: ImageryConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub notifiers: NotifiersConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {}: {}", config_path.display(), e)
        })?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse YAML config: {}", e))?;

        // A zero or negative interval would break the scan timer
        anyhow::ensure!(
            config.monitoring.interval_hours > 0.0,
            "interval_hours must be positive, got {}",
            config.monitoring.interval_hours
        );

        Ok(config)
    }

    /// Look up a zone by case-insensitive name
    pub fn find_zone(&self, name: &str) -> Option<&Zone> {
        self.zones
            .iter()
            .find(|z| z.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
zones:
  - name: Atlas
    bbox: [-8.0, 30.0, -6.0, 32.0]
  - name: Rif
    bbox: [-5.5, 34.5, -3.5, 35.5]

monitoring:
  interval_hours: 2.0
  detection_threshold: 0.75

classifier:
  base_url: http://localhost:8000
"#;

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.monitoring.interval_hours, 2.0);
        assert_eq!(config.monitoring.detection_threshold, 0.75);
        // Untouched sections keep their defaults
        assert_eq!(config.monitoring.alert_cooldown_secs, 30);
        assert!(config.notifiers.telegram.is_none());
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "zones: [unclosed").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn test_nonpositive_interval_rejected() {
        for interval in ["0", "-6.0"] {
            let mut file = NamedTempFile::new().unwrap();
            write!(file, "monitoring:\n  interval_hours: {}", interval).unwrap();

            let result = Config::from_file(file.path());
            assert!(result.is_err());
            assert!(result
                .unwrap_err()
                .to_string()
                .contains("interval_hours must be positive"));
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/config.yaml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("read config file"));
    }

    #[test]
    fn test_find_zone_case_insensitive() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let config = Config::from_file(file.path()).unwrap();

        assert!(config.find_zone("atlas").is_some());
        assert!(config.find_zone("ATLAS").is_some());
        assert!(config.find_zone("Sahara").is_none());
    }
}
