use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::broadcast;

use hostwatch_agent::cli::AgentCli;
use hostwatch_agent::logging;
use hostwatch_agent::scheduler::{Scheduler, SchedulerSettings};
use hostwatch_collector::MetricsCollector;
use hostwatch_core::HostwatchConfig;
use hostwatch_delivery::{DeliveryConfig, HttpDeliveryClient};
use hostwatch_pipeline::{AuthLogTailer, EventBuffer, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = AgentCli::parse();

    // Configuration errors are fatal here; everything after startup is
    // contained per tick.
    let mut config = HostwatchConfig::load(&cli.config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;

    // CLI overrides take precedence over file and environment.
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if cli.validate {
        println!("configuration OK: {}", cli.config.display());
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    hostwatch_core::metrics::describe_all();
    tracing::info!(config = %cli.config.display(), "hostwatch-agent starting");

    // Wire the pipeline: tailer pushes into the shared buffer, the
    // scheduler drains it once per tick.
    let buffer = Arc::new(EventBuffer::new(config.buffer.capacity));
    let tailer = AuthLogTailer::new(PipelineConfig::from_core(&config), Arc::clone(&buffer))
        .map_err(|e| anyhow::anyhow!("failed to build tailer: {}", e))?;
    tracing::info!("pipeline initialized");

    let collector = MetricsCollector::from_core(&config.collector);

    let client = HttpDeliveryClient::new(DeliveryConfig::from_core(&config.api))
        .map_err(|e| anyhow::anyhow!("failed to build delivery client: {}", e))?;
    tracing::info!(endpoint = %config.api.endpoint, "delivery client initialized");

    let (shutdown_tx, _) = broadcast::channel(16);
    let scheduler = Scheduler::new(
        tailer,
        buffer,
        collector,
        client,
        SchedulerSettings {
            interval: Duration::from_secs(config.scheduler.heartbeat_interval_secs),
            auto_ban: config.actions.auto_ban,
        },
        shutdown_tx.subscribe(),
    );
    let scheduler_task = tokio::spawn(scheduler.run());

    tracing::info!("hostwatch-agent running — scheduler active");
    let signal = wait_for_shutdown_signal().await?;
    tracing::info!(signal = signal, "shutdown signal received");

    // Graceful shutdown: an in-flight tick finishes, then the loop exits.
    let _ = shutdown_tx.send(());
    if let Err(e) = scheduler_task.await {
        tracing::error!(error = %e, "scheduler task panicked");
    }

    tracing::info!("hostwatch-agent shut down");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}
