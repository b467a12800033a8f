//! Prometheus exporter for HomematicIP devices.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hmip_common::{ReplayHub, init_tracing};
use tokio::sync::watch;
use tracing::{error, info, warn};

use hmip_exporter_prometheus::{
    Exporter, ExporterConfig, HealthCheck, HttpServer, MetricRegistry, MetricsEngine,
};

/// Prometheus exporter for HomematicIP devices.
#[derive(Parser, Debug)]
#[command(name = "hmip-exporter-prometheus")]
#[command(about = "Export HomematicIP device state as Prometheus metrics")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<String>,

    /// HTTP listen address (overrides config).
    #[arg(long)]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error; overrides config).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        ExporterConfig::load_from_file(config_path)?
    } else {
        ExporterConfig::default()
    };

    if let Some(listen) = args.listen {
        config.prometheus.listen = listen;
        config.validate()?;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting HomematicIP Prometheus Exporter");

    let listen_addr = config
        .prometheus
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    // Gauge families are registered exactly once, before anything is served.
    let mut registry = MetricRegistry::new();
    let engine = Arc::new(MetricsEngine::new(&mut registry)?);
    let registry = Arc::new(registry);

    let hub = ReplayHub::new(config.hub.clone());
    let exporter = Arc::new(Exporter::new(
        hub,
        engine.clone(),
        config.events.channel_capacity,
    ));
    info!("HomematicIP client created");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let http_server = HttpServer::new(
        registry,
        exporter.clone() as Arc<dyn HealthCheck>,
        listen_addr,
        config.prometheus.path.clone(),
    );
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.run(shutdown_rx).await {
            error!("HTTP server error: {}", e);
        }
    });

    let listener = exporter.clone();
    let listener_task = tokio::spawn(async move {
        info!("HomematicIP client started");
        if let Err(e) = listener.start().await {
            error!("HomematicIP client error: {}", e);
        }
    });

    shutdown_signal().await;
    info!("Shutdown started");

    // Stop event listening first, then the web server, all within one grace period.
    let grace_period = Duration::from_secs(config.shutdown.grace_period_secs);
    let deadline = tokio::time::Instant::now() + grace_period;

    match exporter.shutdown(grace_period).await {
        Ok(()) => info!("Event listening stopped"),
        Err(e) => warn!("Error stopping event listening: {}", e),
    }
    if shutdown_tx.send(true).is_err() {
        warn!("HTTP server already stopped");
    }

    let finished = tokio::time::timeout_at(deadline, async {
        let _ = listener_task.await;
        let _ = http_task.await;
    })
    .await;
    if finished.is_err() {
        warn!(
            grace_period_secs = config.shutdown.grace_period_secs,
            "Tasks did not finish within the grace period"
        );
    }

    let stats = engine.stats();
    info!(
        devices_updated = stats.devices_updated,
        devices_excluded = stats.devices_excluded,
        devices_unrecognized = stats.devices_unrecognized,
        rooms_updated = stats.rooms_updated,
        groups_ignored = stats.groups_ignored,
        rooms = engine.room_count(),
        "Final statistics"
    );

    info!("Shutdown finished");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
