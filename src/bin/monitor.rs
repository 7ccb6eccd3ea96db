//! Sensor monitor daemon
//!
//! Connects to the configured device, keeps the link alive, and logs the
//! latest reading at a fixed cadence until Ctrl+C, a closed link, or retry
//! exhaustion.

use sensormon::{config, init_tracing, MonitorConfig, MonitorSink, ShutdownManager};
use serialink::ConnectionState;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_path = config::config_path_from_env();
    let config = MonitorConfig::load(&config_path)?;
    info!(
        "Monitoring {} at {} baud (config: {})",
        config.device,
        config.baud,
        config_path.display()
    );

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let sink = MonitorSink::new(config.history_capacity);
    let observed = sink.shared();

    let manager = serialink::builder()
        .sink(sink)
        .retry_policy(config.retry_policy())
        .running_flag(shutdown.flag())
        .build();

    // A failed first attempt is not fatal; the retry driver takes over
    if let Err(e) = manager.open(&config.device, config.baud).await {
        warn!("Initial connection failed: {}", e);
    }

    while shutdown.is_running() {
        shutdown.interruptible_sleep(Duration::from_secs(5)).await;

        if manager.state() == ConnectionState::Exhausted {
            warn!("Link exhausted its retry budget, exiting");
            break;
        }

        let snapshot = observed.read();
        match snapshot.last_reading {
            Some(sample) => info!(
                "Latest: {:.1} C, {:.1} % (faults: {})",
                sample.reading.temperature, sample.reading.humidity, snapshot.sensor_faults
            ),
            None if snapshot.connected => info!("Connected, waiting for data"),
            None => info!("Link down, waiting for reconnection"),
        }
    }

    manager.close().await?;
    info!("Monitor stopped");
    Ok(())
}
