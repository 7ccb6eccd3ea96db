use crate::traits::{ChannelProvider, RetryPolicy};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a [`ConnectionManager`](crate::ConnectionManager)
///
/// Assembled by the builder; holds every collaborator and tuning knob the
/// manager's background loops need.
pub struct LinkConfig {
    /// Device boundary used to open links and enumerate devices
    pub(crate) provider: Arc<dyn ChannelProvider>,

    /// Retry policy driving reconnection after link loss
    pub(crate) retry: Box<dyn RetryPolicy>,

    /// Byte separating messages on the wire
    pub(crate) delimiter: u8,

    /// How long a read may block before liveness and commands are re-checked
    pub(crate) poll_interval: Duration,

    /// Size of the read buffer handed to the channel
    pub(crate) read_buffer: usize,

    /// Upper bound on waiting for the background task during close
    pub(crate) close_timeout: Duration,

    /// Running flag - when false, every loop stops and close is in progress.
    /// Shared so an external shutdown signal can stop the manager too.
    pub(crate) running: Arc<AtomicBool>,
}

impl LinkConfig {
    /// Get the configured delimiter byte
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Get the read poll interval
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Get the close timeout
    pub fn close_timeout(&self) -> Duration {
        self.close_timeout
    }

    /// Get the retry policy's attempt bound, if any
    pub fn max_attempts(&self) -> Option<usize> {
        self.retry.max_attempts()
    }
}
