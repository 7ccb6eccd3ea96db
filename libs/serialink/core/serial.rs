//! Serial port implementation of the device boundary
//!
//! Opens real serial ports through `tokio-serial`, 8N1 at the requested
//! baud rate. Reads are async and cancellation safe, which is what the
//! manager's poll-bounded read loop requires.

use crate::traits::{Channel, ChannelProvider, DeviceInfo, LinkError, Result};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::debug;

/// Production [`ChannelProvider`] backed by the host's serial ports
#[derive(Debug, Clone, Default)]
pub struct SerialProvider;

impl SerialProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelProvider for SerialProvider {
    async fn open(&self, device: &str, baud: u32) -> Result<Box<dyn Channel>> {
        let stream = tokio_serial::new(device, baud)
            .open_native_async()
            .map_err(|e| LinkError::Open(format!("{}: {}", device, e)))?;

        debug!("Opened serial device {} at {} baud", device, baud);
        Ok(Box::new(SerialChannel { stream }))
    }

    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        let ports = tokio_serial::available_ports()
            .map_err(|e| LinkError::Open(format!("port enumeration failed: {}", e)))?;

        Ok(ports
            .into_iter()
            .map(|port| DeviceInfo {
                name: port.port_name,
                description: match port.port_type {
                    tokio_serial::SerialPortType::UsbPort(info) => info.product,
                    _ => None,
                },
            })
            .collect())
    }
}

/// A live serial link
pub struct SerialChannel {
    stream: SerialStream,
}

#[async_trait]
impl Channel for SerialChannel {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.stream
            .read(buf)
            .await
            .map_err(|e| LinkError::Io(e.to_string()))
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream
            .write_all(bytes)
            .await
            .map_err(|e| LinkError::Io(e.to_string()))
    }

    fn is_open(&self) -> bool {
        // Serial handles do not report liveness out of band; failures
        // surface on the next read or write.
        true
    }
}
