pub mod states;

use crate::config::LinkConfig;
use crate::manager::ConnectionManager;
use crate::serial::SerialProvider;
use crate::traits::*;
use states::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Default retry cadence: fixed 3 s interval, 5 attempts
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_RETRY_ATTEMPTS: usize = 5;

/// Type-state builder for [`ConnectionManager`]
///
/// The event sink is required and enforced at compile time; everything
/// else has a sensible default: real serial ports, `;` delimiter, fixed
/// 3 s × 5 retry policy.
pub struct LinkBuilder<S>
where
    S: SinkState,
{
    _state: TypeState<S>,
    sink: Option<Box<dyn EventSink>>,
    provider: Option<Arc<dyn ChannelProvider>>,
    retry: Option<Box<dyn RetryPolicy>>,
    delimiter: u8,
    poll_interval: Duration,
    read_buffer: usize,
    close_timeout: Duration,
    running: Option<Arc<AtomicBool>>,
}

impl LinkBuilder<NoSink> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            sink: None,
            provider: None,
            retry: None,
            delimiter: b';',
            poll_interval: Duration::from_millis(20),
            read_buffer: 1024,
            close_timeout: Duration::from_secs(1),
            running: None,
        }
    }

    /// Set the consumer's event sink (required)
    pub fn sink(self, sink: impl EventSink) -> LinkBuilder<HasSink> {
        LinkBuilder {
            _state: TypeState::new(),
            sink: Some(Box::new(sink)),
            provider: self.provider,
            retry: self.retry,
            delimiter: self.delimiter,
            poll_interval: self.poll_interval,
            read_buffer: self.read_buffer,
            close_timeout: self.close_timeout,
            running: self.running,
        }
    }
}

impl Default for LinkBuilder<NoSink> {
    fn default() -> Self {
        Self::new()
    }
}

// Optional configuration methods
impl<S> LinkBuilder<S>
where
    S: SinkState,
{
    /// Substitute the device boundary (defaults to real serial ports)
    pub fn provider(mut self, provider: impl ChannelProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set the retry policy (defaults to `FixedInterval(3s, Some(5))`)
    pub fn retry_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.retry = Some(Box::new(policy));
        self
    }

    /// Set the message delimiter byte (defaults to `b';'`)
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set how long a read may block before liveness is re-checked
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the bound on waiting for background work during close
    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Share a running flag for coordinated shutdown across components
    ///
    /// When the flag is stored `false` externally (e.g. by a Ctrl+C
    /// handler), the manager's loops stop as if `close()` had begun.
    pub fn running_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.running = Some(flag);
        self
    }
}

impl LinkBuilder<HasSink> {
    /// Build the connection manager
    ///
    /// The manager starts disconnected; call
    /// [`open`](ConnectionManager::open) to establish the link.
    pub fn build(self) -> ConnectionManager {
        let config = LinkConfig {
            provider: self
                .provider
                .unwrap_or_else(|| Arc::new(SerialProvider::new())),
            retry: self.retry.unwrap_or_else(|| {
                Box::new(FixedInterval::new(
                    DEFAULT_RETRY_INTERVAL,
                    Some(DEFAULT_RETRY_ATTEMPTS),
                ))
            }),
            delimiter: self.delimiter,
            poll_interval: self.poll_interval,
            read_buffer: self.read_buffer,
            close_timeout: self.close_timeout,
            running: self
                .running
                .unwrap_or_else(|| Arc::new(AtomicBool::new(true))),
        };

        // The sink is guaranteed by the HasSink type state
        let sink = match self.sink {
            Some(sink) => sink,
            None => unreachable!("HasSink state without a sink"),
        };

        ConnectionManager::new(config, sink)
    }
}
