use anyhow::Result;
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use wildfire_sentinel::alert::{
    AlertDispatcher, AlertEvent, HeuristicSpreadEstimator, Notifier, SendResult,
};
use wildfire_sentinel::config::{Config, Zone};
use wildfire_sentinel::detector::{
    ClassificationVector, Classifier, ClassifierError, DetectionGate, FireLabel,
};
use wildfire_sentinel::history::{HistoryStore, ZoneScanOutcome};
use wildfire_sentinel::imagery::{ImageryError, ImagerySource, ZoneImage};
use wildfire_sentinel::monitor::{MonitorError, MonitoringService, ZoneScanner};

struct StubImagery {
    failing_zone: Option<String>,
}

#[async_trait]
impl ImagerySource for StubImagery {
    async fn fetch(&self, zone: &Zone) -> Result<ZoneImage, ImageryError> {
        if self.failing_zone.as_deref() == Some(zone.name.as_str()) {
            return Err(ImageryError::Request("tile timeout".to_string()));
        }
        Ok(ZoneImage::new(vec![0u8; 16]))
    }

    async fn is_available(&self) -> bool {
        true
    }
}

struct StubClassifier {
    fire_score: f64,
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn predict(&self, _image: &ZoneImage) -> Result<ClassificationVector, ClassifierError> {
        Ok(ClassificationVector::new(vec![
            1.0 - self.fire_score,
            self.fire_score,
        ]))
    }

    async fn is_available(&self) -> bool {
        true
    }
}

struct RecordingNotifier {
    sends: AtomicUsize,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, event: &AlertEvent) -> Result<SendResult> {
        // Enrichment happened before fan-out
        assert!(event.result.brightness_kelvin.is_some());
        assert!(event.result.spread_radius_km.is_some());
        self.sends.fetch_add(1, Ordering::SeqCst);
        Ok(SendResult::Sent)
    }
}

fn build_service(
    config: &Config,
    fire_score: f64,
    failing_zone: Option<&str>,
    cooldown: Duration,
) -> (Arc<MonitoringService>, Arc<RecordingNotifier>, Arc<HistoryStore>) {
    let notifier = Arc::new(RecordingNotifier {
        sends: AtomicUsize::new(0),
    });
    let history = Arc::new(HistoryStore::new(config.monitoring.history_capacity));
    let dispatcher = Arc::new(AlertDispatcher::new(
        vec![notifier.clone()],
        Arc::new(HeuristicSpreadEstimator::default()),
        cooldown,
        Duration::from_secs(5),
    ));
    let gate = DetectionGate::new(
        Arc::new(StubClassifier { fire_score }),
        config.classifier.class_labels.clone(),
    );
    let scanner = Arc::new(ZoneScanner::new(
        config.zones.clone(),
        Arc::new(StubImagery {
            failing_zone: failing_zone.map(str::to_string),
        }),
        gate,
        dispatcher,
        history.clone(),
    ));
    let service = Arc::new(MonitoringService::new(
        scanner,
        history.clone(),
        config.monitoring.interval(),
        config.monitoring.detection_threshold,
    ));
    (service, notifier, history)
}

#[test]
fn test_shipped_config_loads() -> Result<()> {
    let config = Config::from_file(Path::new("config.yaml"))?;
    assert!(!config.zones.is_empty());
    assert_eq!(config.monitoring.detection_threshold, 0.70);
    assert_eq!(
        config.classifier.class_labels,
        vec![FireLabel::NoFire, FireLabel::Fire]
    );
    Ok(())
}

#[test]
fn test_invalid_config_reports_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "zones: [broken").unwrap();

    let result = Config::from_file(file.path());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("parse"));
}

#[tokio::test]
async fn test_full_scan_with_partial_failure_alerts_and_records() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
zones:
  - name: Atlas
    bbox: [-8.0, 30.0, -6.0, 32.0]
  - name: Rif
    bbox: [-5.5, 34.5, -3.5, 35.5]
monitoring:
  detection_threshold: 0.70
"#
    )?;
    let config = Config::from_file(file.path())?;

    let (service, notifier, history) =
        build_service(&config, 0.92, Some("Rif"), Duration::ZERO);

    let record = service.scan_all().await;

    // Every zone accounted for, the failed one as an error entry
    assert_eq!(record.results.len(), 2);
    assert!(record
        .results
        .iter()
        .any(|r| matches!(r, ZoneScanOutcome::Error(e) if e.zone == "Rif")));

    // The reachable zone burned and alerted; the cycle still landed in history
    assert_eq!(record.fires_detected, 1);
    assert_eq!(notifier.sends.load(Ordering::SeqCst), 1);
    assert_eq!(history.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_below_threshold_fires_never_alert() {
    let config = Config {
        zones: vec![Zone::new("Atlas", [-8.0, 30.0, -6.0, 32.0])],
        ..Default::default()
    };
    let (service, notifier, _) = build_service(&config, 0.65, None, Duration::ZERO);

    let record = service.scan_all().await;
    assert_eq!(record.fires_detected, 1);
    assert_eq!(notifier.sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_lifecycle_misuse_is_typed() {
    let config = Config {
        zones: vec![Zone::new("Atlas", [-8.0, 30.0, -6.0, 32.0])],
        ..Default::default()
    };
    let (service, _, _) = build_service(&config, 0.1, None, Duration::from_secs(30));

    assert!(matches!(service.stop().await, Err(MonitorError::NotRunning)));

    service
        .start(Duration::from_secs(3600), 0.7)
        .await
        .unwrap();
    assert!(matches!(
        service.start(Duration::from_secs(3600), 0.7).await,
        Err(MonitorError::AlreadyRunning)
    ));

    let status = service.status().await;
    assert!(status.running);
    assert_eq!(status.zones, 1);
    assert_eq!(status.recent_scans, 1);

    service.stop().await.unwrap();
    assert!(!service.status().await.running);
}

#[tokio::test]
async fn test_cooldown_throttles_back_to_back_cycles() {
    let config = Config {
        zones: vec![Zone::new("Atlas", [-8.0, 30.0, -6.0, 32.0])],
        ..Default::default()
    };
    let (service, notifier, history) =
        build_service(&config, 0.95, None, Duration::from_secs(60));

    // Two manual cycles back to back: both recorded, one alert
    service.scan_all().await;
    service.scan_all().await;

    assert_eq!(history.len().await, 2);
    assert_eq!(notifier.sends.load(Ordering::SeqCst), 1);
}
