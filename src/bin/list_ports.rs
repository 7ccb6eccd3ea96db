//! List attachable serial devices

use serialink::{ChannelProvider, SerialProvider};

fn main() -> anyhow::Result<()> {
    let devices = SerialProvider::new().list_devices()?;

    if devices.is_empty() {
        println!("No serial devices found");
        return Ok(());
    }

    for device in devices {
        match device.description {
            Some(description) => println!("{} - {}", device.name, description),
            None => println!("{}", device.name),
        }
    }
    Ok(())
}
