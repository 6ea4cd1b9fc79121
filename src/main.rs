use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use wildfire_sentinel::alert::channels::{EmailNotifier, TelegramNotifier};
use wildfire_sentinel::alert::{AlertDispatcher, HeuristicSpreadEstimator, Notifier};
use wildfire_sentinel::cli::{Cli, Commands, ScanArgs};
use wildfire_sentinel::config::{Config, NotifiersConfig};
use wildfire_sentinel::detector::{DetectionGate, RemoteClassifier};
use wildfire_sentinel::history::HistoryStore;
use wildfire_sentinel::imagery::SentinelImagerySource;
use wildfire_sentinel::monitor::{MonitoringService, ZoneScanner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from("config.yaml"));

    match cli.command {
        None => run_monitor_command(&config_path).await?,
        Some(Commands::Show) => handle_show_command(&config_path)?,
        Some(Commands::Scan(args)) => run_scan_command(&config_path, &args).await?,
    }

    Ok(())
}

/// Run the monitoring daemon (default mode when no subcommand is provided)
async fn run_monitor_command(config_path: &PathBuf) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load config")?;
    anyhow::ensure!(!config.zones.is_empty(), "No zones configured");

    let service = build_service(&config)?;

    println!("🔥 Wildfire Sentinel started");
    println!("📂 Config file: {}", config_path.display());
    println!("🗺️  Monitoring {} zones", config.zones.len());
    println!("🛑 Press Ctrl+C to stop");

    let report = service
        .start(
            config.monitoring.interval(),
            config.monitoring.detection_threshold,
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start monitoring: {}", e))?;

    println!(
        "✅ Initial scan complete: {} fires detected",
        report.first_cycle.fires_detected
    );
    println!("⏰ Next scan at {}", report.next_scan.format("%Y-%m-%d %H:%M UTC"));

    // Wait for Ctrl+C signal
    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    println!("\n🛑 Received Ctrl+C, shutting down...");

    service
        .stop()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to stop monitoring: {}", e))?;

    Ok(())
}

/// Run a one-shot manual scan and print the outcome as JSON
async fn run_scan_command(config_path: &PathBuf, args: &ScanArgs) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load config")?;
    let service = build_service(&config)?;

    match &args.zone {
        Some(zone) => {
            let outcome = service
                .scan_zone(zone)
                .await
                .map_err(|e| anyhow::anyhow!("Scan failed: {}", e))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        None => {
            let record = service.scan_all().await;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

/// Print the loaded configuration summary
fn handle_show_command(config_path: &PathBuf) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load config")?;

    println!("Loaded {} zones", config.zones.len());
    for zone in &config.zones {
        let (lat, lon) = zone.center();
        println!("  {}: center ({:.4}, {:.4})", zone.name, lat, lon);
    }

    println!("\nMonitoring config:");
    println!("  interval_hours: {}", config.monitoring.interval_hours);
    println!(
        "  detection_threshold: {}",
        config.monitoring.detection_threshold
    );
    println!(
        "  alert_cooldown_secs: {}",
        config.monitoring.alert_cooldown_secs
    );
    println!(
        "  history_capacity: {}",
        config.monitoring.history_capacity
    );

    println!("\nCollaborators:");
    println!(
        "  imagery: {}",
        if config.imagery.is_configured() {
            config.imagery.base_url.as_str()
        } else {
            "(not configured)"
        }
    );
    println!(
        "  classifier: {}",
        if config.classifier.base_url.is_empty() {
            "(not configured)"
        } else {
            config.classifier.base_url.as_str()
        }
    );

    let notifiers = config.notifiers.resolved();
    println!("\nAlert channels:");
    println!("  email: {}", notifiers.email.is_some());
    println!("  telegram: {}", notifiers.telegram.is_some());

    Ok(())
}

/// Wire collaborators and the orchestration stack from config
fn build_service(config: &Config) -> Result<Arc<MonitoringService>> {
    let imagery = Arc::new(
        SentinelImagerySource::new(config.imagery.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create imagery source: {}", e))?,
    );
    let classifier = Arc::new(
        RemoteClassifier::new(config.classifier.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create classifier client: {}", e))?,
    );

    let dispatcher = Arc::new(AlertDispatcher::new(
        build_notifiers(&config.notifiers.resolved()),
        Arc::new(HeuristicSpreadEstimator::default()),
        config.monitoring.alert_cooldown(),
        config.monitoring.notifier_timeout(),
    ));

    let history = Arc::new(HistoryStore::new(config.monitoring.history_capacity));
    let gate = DetectionGate::new(classifier, config.classifier.class_labels.clone());
    let scanner = Arc::new(ZoneScanner::new(
        config.zones.clone(),
        imagery,
        gate,
        dispatcher,
        history.clone(),
    ));

    Ok(Arc::new(MonitoringService::new(
        scanner,
        history,
        config.monitoring.interval(),
        config.monitoring.detection_threshold,
    )))
}

/// Construct the configured alert channels; a channel with bad settings is
/// skipped with a warning rather than failing startup.
fn build_notifiers(config: &NotifiersConfig) -> Vec<Arc<dyn Notifier>> {
    let mut channels: Vec<Arc<dyn Notifier>> = Vec::new();

    if let Some(email) = &config.email {
        match EmailNotifier::new(email.clone()) {
            Ok(notifier) => channels.push(Arc::new(notifier)),
            Err(e) => eprintln!("⚠️ Email channel disabled: {}", e),
        }
    }

    if let Some(telegram) = &config.telegram {
        match TelegramNotifier::new(telegram.clone()) {
            Ok(notifier) => channels.push(Arc::new(notifier)),
            Err(e) => eprintln!("⚠️ Telegram channel disabled: {}", e),
        }
    }

    if channels.is_empty() {
        eprintln!("⚠️ No alert channels configured; detections will only be logged");
    }

    channels
}
