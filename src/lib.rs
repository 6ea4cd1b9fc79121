pub mod alert;
pub mod cli;
pub mod config;
pub mod detector;
pub mod history;
pub mod imagery;
pub mod monitor;
pub mod stream;

// Public API
pub use alert::{AlertDispatcher, AlertEvent, DispatchOutcome, Notifier, SendResult};
pub use config::{Config, Zone};
pub use detector::{Classifier, DetectionGate, DetectionResult, FireLabel, RemoteClassifier};
pub use history::{HistoryStore, ScanCycleRecord, ZoneScanOutcome};
pub use imagery::{ImagerySource, SentinelImagerySource, ZoneImage};
pub use monitor::{MonitorError, MonitoringService, MonitoringStatus, ZoneScanner};
pub use stream::{FrameSource, StreamDetector};
