use crate::config::LinkConfig;
use crate::connection_state::{
    AtomicConnectionState, ConnectionState, LinkMetrics, MetricsSnapshot, RetryCounter,
};
use crate::decoder::{FrameDecoder, Message};
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Internal command messages for the read session
#[derive(Debug)]
enum LinkCommand {
    /// Write an outbound token to the device
    Send(String),
}

/// Internal event messages funneled to the dispatcher
#[derive(Debug)]
pub(crate) enum LinkEvent {
    /// A complete message was decoded
    Message(Message),
    /// The live link was lost
    Disconnected,
    /// A connection attempt succeeded
    Reconnected,
    /// A connection attempt failed (attempt 0 = manual open)
    ConnectionFailed {
        reason: String,
        attempt: usize,
        max: Option<usize>,
    },
    /// The retry driver gave up
    RetryExhausted { attempts: usize },
}

/// The device the manager is (re)connecting to
#[derive(Debug, Clone)]
struct LinkTarget {
    device: String,
    baud: u32,
}

/// Why a read session ended
enum SessionEnd {
    /// The manager is closing; exit silently
    Shutdown,
    /// The link failed; reconnection takes over
    Lost(String),
}

/// Owns the physical link's lifecycle
///
/// One manager per device. A single background task alternates between the
/// read session (while connected) and the retry phase (while the link is
/// down), so the two loops can never run at the same time. Decoded
/// messages and lifecycle transitions are funneled through one channel to
/// one dispatcher thread, which invokes the consumer's [`EventSink`]
/// strictly in order.
///
/// Built via `serialink::builder()`.
pub struct ConnectionManager {
    config: Arc<LinkConfig>,
    state: Arc<AtomicConnectionState>,
    retries: Arc<RetryCounter>,
    metrics: Arc<LinkMetrics>,
    command_tx: Sender<LinkCommand>,
    command_rx: Receiver<LinkCommand>,
    event_tx: Sender<LinkEvent>,
    /// Supervisor task handle (read session + retry phase)
    supervisor: Mutex<Option<tokio::task::JoinHandle<()>>>,
    /// Dispatcher thread handle (ordered sink delivery)
    dispatcher: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl ConnectionManager {
    /// Create a new manager from configuration
    ///
    /// This is called by the builder's `build()` method; use
    /// `serialink::builder()` to create one.
    pub(crate) fn new(config: LinkConfig, sink: Box<dyn EventSink>) -> Self {
        let config = Arc::new(config);
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let dispatcher = spawn_dispatcher(sink, event_rx, Arc::clone(&config.running));

        Self {
            config,
            state: Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected)),
            retries: Arc::new(RetryCounter::new()),
            metrics: Arc::new(LinkMetrics::new()),
            command_tx,
            command_rx,
            event_tx,
            supervisor: Mutex::new(None),
            dispatcher: Mutex::new(Some(dispatcher)),
        }
    }

    /// Open the link to `device` at the given baud rate
    ///
    /// Valid from Disconnected or Exhausted. The first attempt runs inline
    /// so the caller learns its outcome; on failure the retry driver is
    /// armed before the error is returned, exactly as if a live link had
    /// dropped.
    pub async fn open(&self, device: &str, baud: u32) -> Result<()> {
        if !self.running() {
            return Err(LinkError::InvalidState("manager is closed".into()));
        }

        let from = self.state.get();
        let can_open =
            from == ConnectionState::Disconnected || from == ConnectionState::Exhausted;
        if !can_open || !self.state.try_transition(from, ConnectionState::Connecting) {
            return Err(LinkError::InvalidState(format!(
                "cannot open while {:?}",
                from
            )));
        }

        // A fresh manual open starts a fresh retry cycle
        self.retries.reset();
        // Reap the finished supervisor of a previous exhausted session
        drop(self.supervisor.lock().take());

        let target = LinkTarget {
            device: device.to_string(),
            baud,
        };
        let ctx = self.link_context();

        info!("Opening {} at {} baud", device, baud);
        match self.config.provider.open(device, baud).await {
            Ok(channel) => {
                ctx.mark_connected();
                info!("Connected to {}", device);
                let handle = tokio::spawn(run_link(ctx, target, Some(channel)));
                *self.supervisor.lock() = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.state.set(ConnectionState::Disconnected);
                let reason = e.to_string();
                warn!("Connection to {} failed: {}", device, reason);
                let _ = self.event_tx.send(LinkEvent::ConnectionFailed {
                    reason,
                    attempt: 0,
                    max: self.config.max_attempts(),
                });
                let handle = tokio::spawn(run_link(ctx, target, None));
                *self.supervisor.lock() = Some(handle);
                Err(e)
            }
        }
    }

    /// Submit an outbound command token
    ///
    /// The token is written to the device as `<token>\n` by the read
    /// session. Returns [`LinkError::NotConnected`] when the link is down;
    /// nothing is queued in that case.
    pub fn send(&self, command: &str) -> Result<()> {
        if !self.state.is_connected() {
            return Err(LinkError::NotConnected);
        }
        self.command_tx
            .send(LinkCommand::Send(command.to_string()))
            .map_err(|e| LinkError::ChannelSend(e.to_string()))
    }

    /// Check if the link is live
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Get the current connection state
    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Get a point-in-time metrics snapshot
    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.metrics.messages_received(),
            commands_sent: self.metrics.commands_sent(),
            reconnects: self.metrics.reconnects(),
            connection_state: self.state.get(),
        }
    }

    /// Enumerate attachable devices through the configured provider
    pub fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        self.config.provider.list_devices()
    }

    /// Close the manager
    ///
    /// Idempotent and safe to call concurrently, including while a failure
    /// callback is in flight. Stops both background loops, waits a bounded
    /// period for the supervisor (aborting it on overrun; the handle is
    /// released by drop either way), then joins the dispatcher thread.
    /// The manager is terminal afterwards: `open()` returns `InvalidState`.
    pub async fn close(&self) -> Result<()> {
        // First close clears the flag; later calls only reap what is left
        if self.config.running.swap(false, Ordering::AcqRel) {
            info!("Closing link");
        }

        let supervisor = self.supervisor.lock().take();
        if let Some(mut handle) = supervisor {
            if tokio::time::timeout(self.config.close_timeout, &mut handle)
                .await
                .is_err()
            {
                warn!("Background task did not stop in time, aborting it");
                handle.abort();
            }
        }

        let dispatcher = self.dispatcher.lock().take();
        if let Some(handle) = dispatcher {
            let _ = handle.join();
        }

        self.state.set(ConnectionState::Disconnected);
        Ok(())
    }

    #[inline]
    fn running(&self) -> bool {
        self.config.running.load(Ordering::Acquire)
    }

    fn link_context(&self) -> LinkContext {
        LinkContext {
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
            retries: Arc::clone(&self.retries),
            metrics: Arc::clone(&self.metrics),
            command_rx: self.command_rx.clone(),
            event_tx: self.event_tx.clone(),
        }
    }
}

/// Shared handles the background task works with
#[derive(Clone)]
struct LinkContext {
    config: Arc<LinkConfig>,
    state: Arc<AtomicConnectionState>,
    retries: Arc<RetryCounter>,
    metrics: Arc<LinkMetrics>,
    command_rx: Receiver<LinkCommand>,
    event_tx: Sender<LinkEvent>,
}

impl LinkContext {
    #[inline]
    fn running(&self) -> bool {
        self.config.running.load(Ordering::Acquire)
    }

    /// The one success transition, shared by manual open and the retry
    /// driver: Connected state, counter reset, `on_reconnected` emitted.
    fn mark_connected(&self) {
        if self.retries.current() > 0 {
            self.metrics.increment_reconnects();
        }
        self.state.set(ConnectionState::Connected);
        self.retries.reset();
        let _ = self.event_tx.send(LinkEvent::Reconnected);
    }
}

/// Supervisor loop: read session while connected, retry phase otherwise
async fn run_link(ctx: LinkContext, target: LinkTarget, initial: Option<Box<dyn Channel>>) {
    let mut session = initial;

    loop {
        if let Some(channel) = session.take() {
            match read_session(channel, &ctx).await {
                SessionEnd::Shutdown => {
                    debug!("Read loop stopped by shutdown");
                    return;
                }
                SessionEnd::Lost(reason) => {
                    ctx.state.set(ConnectionState::Disconnected);
                    warn!("Link to {} lost: {}", target.device, reason);
                    let _ = ctx.event_tx.send(LinkEvent::Disconnected);
                }
            }
        }

        // A racing manual open may have claimed the link between the loss
        // and here; if so, this driver stands down.
        if !ctx
            .state
            .try_transition(ConnectionState::Disconnected, ConnectionState::Reconnecting)
        {
            debug!("Manual open in progress, retry driver standing down");
            return;
        }
        loop {
            if !ctx.running() {
                return;
            }

            let next = ctx.retries.current() + 1;
            let Some(delay) = ctx.config.retry.delay_before(next) else {
                let attempts = ctx.retries.current();
                ctx.state.set(ConnectionState::Exhausted);
                warn!(
                    "Giving up on {} after {} failed attempts",
                    target.device, attempts
                );
                let _ = ctx.event_tx.send(LinkEvent::RetryExhausted { attempts });
                return;
            };

            if !sleep_while_running(delay, &ctx).await {
                debug!("Retry wait interrupted by shutdown");
                return;
            }

            let attempt = ctx.retries.advance();
            debug!("Reopen attempt {} for {}", attempt, target.device);
            match ctx.config.provider.open(&target.device, target.baud).await {
                Ok(channel) => {
                    ctx.mark_connected();
                    info!("Reconnected to {} on attempt {}", target.device, attempt);
                    session = Some(channel);
                    break;
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(
                        "Reopen attempt {} for {} failed: {}",
                        attempt, target.device, reason
                    );
                    let _ = ctx.event_tx.send(LinkEvent::ConnectionFailed {
                        reason,
                        attempt,
                        max: ctx.config.max_attempts(),
                    });
                }
            }
        }
    }
}

/// Read loop over a live channel
///
/// Drains pending outbound commands, then reads under the poll timeout so
/// liveness and the running flag are re-checked at a bounded cadence. Any
/// read error, zero-length read, or dead handle ends the session as Lost.
async fn read_session(mut channel: Box<dyn Channel>, ctx: &LinkContext) -> SessionEnd {
    let mut decoder = FrameDecoder::new(ctx.config.delimiter);
    let mut buf = vec![0u8; ctx.config.read_buffer];

    loop {
        if !ctx.running() {
            return SessionEnd::Shutdown;
        }
        if !channel.is_open() {
            return SessionEnd::Lost("handle reports closed".into());
        }

        while let Ok(LinkCommand::Send(token)) = ctx.command_rx.try_recv() {
            let mut frame = token.into_bytes();
            frame.push(b'\n');
            if let Err(e) = channel.write_all(&frame).await {
                return SessionEnd::Lost(format!("write failed: {}", e));
            }
            ctx.metrics.increment_sent();
        }

        match tokio::time::timeout(ctx.config.poll_interval, channel.read(&mut buf)).await {
            // No bytes yet; loop around to re-check liveness and commands
            Err(_) => continue,
            Ok(Ok(0)) => return SessionEnd::Lost("stream ended".into()),
            Ok(Ok(n)) => {
                for message in decoder.feed(&buf[..n]) {
                    ctx.metrics.increment_received();
                    let _ = ctx.event_tx.send(LinkEvent::Message(message));
                }
            }
            Ok(Err(e)) => return SessionEnd::Lost(e.to_string()),
        }
    }
}

/// Sleep in small steps, waking early when the running flag clears
///
/// Returns `false` if shutdown was requested during the wait.
async fn sleep_while_running(duration: Duration, ctx: &LinkContext) -> bool {
    let check_interval = Duration::from_millis(20);
    let mut elapsed = Duration::ZERO;

    while elapsed < duration {
        if !ctx.running() {
            return false;
        }
        let step = check_interval.min(duration - elapsed);
        tokio::time::sleep(step).await;
        elapsed += step;
    }
    ctx.running()
}

/// Spawn the dispatcher thread that delivers events to the sink in order
///
/// Events from the read session and the retry phase share one channel, so
/// the consumer never observes callbacks concurrently or out of order.
/// The thread drains queued events before honoring shutdown.
fn spawn_dispatcher(
    mut sink: Box<dyn EventSink>,
    event_rx: Receiver<LinkEvent>,
    running: Arc<std::sync::atomic::AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            match event_rx.recv_timeout(Duration::from_millis(50)) {
                Ok(LinkEvent::Message(message)) => sink.on_data_received(message),
                Ok(LinkEvent::Disconnected) => sink.on_disconnected(),
                Ok(LinkEvent::Reconnected) => sink.on_reconnected(),
                Ok(LinkEvent::ConnectionFailed {
                    reason,
                    attempt,
                    max,
                }) => sink.on_connection_failed(&reason, attempt, max),
                Ok(LinkEvent::RetryExhausted { attempts }) => sink.on_retry_exhausted(attempts),
                Err(RecvTimeoutError::Timeout) => {
                    if !running.load(Ordering::Acquire) {
                        debug!("Dispatcher thread exiting");
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
