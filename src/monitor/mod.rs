//! Monitoring orchestration: the scan cycle runner and the start/stop
//! state machine driving it on a timer.

pub mod scanner;
pub mod service;

use thiserror::Error;

pub use scanner::ZoneScanner;
pub use service::{MonitoringService, MonitoringStatus, StartReport};

#[derive(Debug, Error)]
pub enum MonitorError {
    /// `start` while the scheduler is already running. No state change.
    #[error("Monitoring already running")]
    AlreadyRunning,
    /// `stop` while idle. No state change.
    #[error("Monitoring not running")]
    NotRunning,
    /// A required collaborator is missing credentials or a model.
    /// Fatal to `start`, reported per scan for manual scans.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unknown zone: {0}")]
    UnknownZone(String),
}
