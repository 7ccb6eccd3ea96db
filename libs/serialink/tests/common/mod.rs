//! Common test utilities for SeriaLink integration tests
//!
//! Provides a scripted in-memory device and an event-recording sink for
//! driving the connection manager without hardware.

use async_trait::async_trait;
use parking_lot::Mutex;
use serialink::{Channel, ChannelProvider, DeviceInfo, EventSink, LinkError, Message, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// A scripted in-memory device
///
/// Cloning shares the script: tests keep one handle to inject bytes,
/// failures and link drops while the manager owns another as its provider.
#[derive(Clone)]
pub struct MockDevice {
    inner: Arc<Mutex<MockState>>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

struct MockState {
    opens: usize,
    fail_next: usize,
    always_fail: bool,
    session: Option<Session>,
}

struct Session {
    data_tx: UnboundedSender<Vec<u8>>,
    open: Arc<AtomicBool>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                opens: 0,
                fail_next: 0,
                always_fail: false,
                session: None,
            })),
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Total number of open attempts seen so far
    pub fn opens(&self) -> usize {
        self.inner.lock().opens
    }

    /// Refuse the next `n` open attempts
    pub fn fail_next_opens(&self, n: usize) {
        self.inner.lock().fail_next = n;
    }

    /// Refuse every open attempt until cleared
    pub fn always_fail(&self, fail: bool) {
        self.inner.lock().always_fail = fail;
    }

    /// Feed bytes into the live session, if any
    pub fn feed(&self, bytes: &[u8]) {
        if let Some(session) = self.inner.lock().session.as_ref() {
            let _ = session.data_tx.send(bytes.to_vec());
        }
    }

    /// Kill the live link: the next read observes end-of-stream
    pub fn drop_link(&self) {
        self.inner.lock().session = None;
    }

    /// Mark the live handle closed without ending the stream
    pub fn mark_closed(&self) {
        if let Some(session) = self.inner.lock().session.as_ref() {
            session.open.store(false, Ordering::Release);
        }
    }

    /// Everything written to the device so far, across sessions
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().clone()
    }

    /// Wait until the recorded writes satisfy `predicate`
    pub async fn wait_for_writes<F>(&self, timeout: Duration, predicate: F) -> bool
    where
        F: Fn(&[Vec<u8>]) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if predicate(self.writes.lock().as_slice()) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelProvider for MockDevice {
    async fn open(&self, _device: &str, _baud: u32) -> Result<Box<dyn Channel>> {
        let mut state = self.inner.lock();
        state.opens += 1;

        if state.always_fail {
            return Err(LinkError::Open("mock: device unavailable".into()));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(LinkError::Open("mock: device busy".into()));
        }

        let (data_tx, data_rx) = unbounded_channel();
        let open = Arc::new(AtomicBool::new(true));
        state.session = Some(Session {
            data_tx,
            open: Arc::clone(&open),
        });

        Ok(Box::new(MockChannel {
            data_rx,
            open,
            writes: Arc::clone(&self.writes),
            pending: Vec::new(),
        }))
    }

    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(vec![DeviceInfo {
            name: "mock0".to_string(),
            description: Some("scripted mock device".to_string()),
        }])
    }
}

struct MockChannel {
    data_rx: UnboundedReceiver<Vec<u8>>,
    open: Arc<AtomicBool>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    pending: Vec<u8>,
}

#[async_trait]
impl Channel for MockChannel {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.open.load(Ordering::Acquire) {
            return Err(LinkError::Io("mock: handle closed".into()));
        }
        if self.pending.is_empty() {
            match self.data_rx.recv().await {
                Some(chunk) => self.pending = chunk,
                None => return Ok(0),
            }
        }
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(LinkError::Io("mock: handle closed".into()));
        }
        self.writes.lock().push(bytes.to_vec());
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

/// What a sink observed, in delivery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Data(String),
    Disconnected,
    Reconnected,
    Failed { attempt: usize, max: Option<usize> },
    Exhausted { attempts: usize },
}

/// An [`EventSink`] that records every callback
#[derive(Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    /// Wait until the recorded events satisfy `predicate`
    pub async fn wait_until<F>(&self, timeout: Duration, predicate: F) -> bool
    where
        F: Fn(&[SinkEvent]) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if predicate(self.events.lock().as_slice()) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn on_data_received(&mut self, message: Message) {
        self.events.lock().push(SinkEvent::Data(message.into_string()));
    }

    fn on_disconnected(&mut self) {
        self.events.lock().push(SinkEvent::Disconnected);
    }

    fn on_reconnected(&mut self) {
        self.events.lock().push(SinkEvent::Reconnected);
    }

    fn on_connection_failed(&mut self, _reason: &str, attempt: usize, max: Option<usize>) {
        self.events.lock().push(SinkEvent::Failed { attempt, max });
    }

    fn on_retry_exhausted(&mut self, attempts: usize) {
        self.events.lock().push(SinkEvent::Exhausted { attempts });
    }
}
