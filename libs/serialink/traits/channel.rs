use crate::error::Result;
use async_trait::async_trait;

/// Identity of an attachable device, as reported by enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// System name of the device (e.g. `/dev/ttyUSB0`, `COM5`)
    pub name: String,
    /// Human-readable description, when the platform provides one
    pub description: Option<String>,
}

/// Factory side of the device boundary
///
/// Implement this trait to control how links are established. The
/// production implementation opens real serial ports; tests substitute a
/// scripted mock.
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// Open a link to `device` at the given baud rate
    ///
    /// # Returns
    /// * `Ok(channel)` - A live, exclusively owned handle
    /// * `Err(LinkError::Open)` - Device absent, busy, or misconfigured
    async fn open(&self, device: &str, baud: u32) -> Result<Box<dyn Channel>>;

    /// Enumerate attachable devices
    fn list_devices(&self) -> Result<Vec<DeviceInfo>>;
}

/// A live, exclusively owned link handle
///
/// Dropping a channel releases the underlying handle; there is no
/// explicit close. `read` must be cancellation safe (the manager polls it
/// under a timeout): a timed-out read must not consume bytes.
#[async_trait]
pub trait Channel: Send {
    /// Read available bytes into `buf`, waiting until at least one arrives
    ///
    /// # Returns
    /// * `Ok(n)` with `n > 0` - Bytes read
    /// * `Ok(0)` - The peer closed the link
    /// * `Err(LinkError::Io)` - The link failed
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all of `bytes` to the device
    async fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Whether the handle still looks alive
    ///
    /// Best effort: a `true` here does not guarantee the next read will
    /// succeed.
    fn is_open(&self) -> bool;
}
