//! Scan scheduling and alert throttling settings.

use serde::Deserialize;
use std::time::Duration;

fn default_interval_hours() -> f64 {
    6.0
}

fn default_detection_threshold() -> f64 {
    0.70
}

fn default_alert_cooldown_secs() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    100
}

fn default_notifier_timeout_secs() -> u64 {
    15
}

/// Scheduler and alerting section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Hours between scheduled full scans
    #[serde(default = "default_interval_hours")]
    pub interval_hours: f64,
    /// Minimum confidence for a fire detection to trigger an alert
    #[serde(default = "default_detection_threshold")]
    pub detection_threshold: f64,
    /// Minimum seconds between two dispatched alerts
    #[serde(default = "default_alert_cooldown_secs")]
    pub alert_cooldown_secs: u64,
    /// How many scan cycle records to retain in memory
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Per-notifier send timeout during alert fan-out
    #[serde(default = "default_notifier_timeout_secs")]
    pub notifier_timeout_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
            detection_threshold: default_detection_threshold(),
            alert_cooldown_secs: default_alert_cooldown_secs(),
            history_capacity: default_history_capacity(),
            notifier_timeout_secs: default_notifier_timeout_secs(),
        }
    }
}

impl MonitoringConfig {
    /// Scan interval as a `Duration`. Non-positive values clamp to zero,
    /// which `MonitoringService::start` rejects.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64((self.interval_hours * 3600.0).max(0.0))
    }

    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown_secs)
    }

    pub fn notifier_timeout(&self) -> Duration {
        Duration::from_secs(self.notifier_timeout_secs)
    }
}
