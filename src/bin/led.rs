//! One-shot actuator control
//!
//! Usage: `led <device> <on|off> [baud]`

use anyhow::{bail, Context};
use sensormon::{init_tracing, ActuatorCommand};
use serialink::NoRetry;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (device, action) = match args.as_slice() {
        [device, action] | [device, action, _] => (device.clone(), action.clone()),
        _ => bail!("usage: led <device> <on|off> [baud]"),
    };
    let baud: u32 = match args.get(2) {
        Some(raw) => raw.parse().context("baud must be a number")?,
        None => 9600,
    };
    let command = match ActuatorCommand::from_name(&action) {
        Some(command) => command,
        None => bail!("unknown action {:?}, expected on or off", action),
    };

    let manager = serialink::builder()
        .sink(serialink::NoOpSink)
        .retry_policy(NoRetry)
        .build();

    manager
        .open(&device, baud)
        .await
        .context("could not open device")?;
    manager.send(command.token())?;

    // Give the write a moment to flush before tearing down
    tokio::time::sleep(Duration::from_millis(100)).await;
    manager.close().await?;

    info!("Sent {} to {}", command.token(), device);
    Ok(())
}
