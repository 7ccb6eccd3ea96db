use crate::core::decoder::Message;

/// Capability the link manager requires of its consumer
///
/// The manager invokes the sink from a single dedicated dispatcher thread:
/// callbacks are never concurrent, and they arrive in the order the
/// underlying events occurred. In particular, `on_disconnected` is always
/// delivered before any `on_connection_failed`/`on_reconnected` that
/// follows it for the same link.
///
/// Implementations should return quickly; a slow sink delays every later
/// event but never the I/O loops themselves.
pub trait EventSink: Send + 'static {
    /// A complete message was decoded from the byte stream
    fn on_data_received(&mut self, message: Message);

    /// The live link was lost (read error, closed handle, zero-length read)
    fn on_disconnected(&mut self);

    /// A connection attempt succeeded
    ///
    /// Also fired for the first successful connection, not only for
    /// recoveries.
    fn on_reconnected(&mut self);

    /// A connection attempt failed
    ///
    /// `attempt` is 0 for a failed manual `open()`, and counts 1..=max for
    /// attempts made by the retry driver. `max` is the policy's attempt
    /// bound, if any.
    fn on_connection_failed(&mut self, reason: &str, attempt: usize, max: Option<usize>);

    /// The retry driver gave up after `attempts` failed attempts
    ///
    /// Delivered exactly once per exhaustion; the link stays down until a
    /// manual `open()`.
    fn on_retry_exhausted(&mut self, attempts: usize);
}

/// A sink that ignores every event
///
/// Useful for fire-and-forget command tools and tests.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn on_data_received(&mut self, _message: Message) {}

    fn on_disconnected(&mut self) {}

    fn on_reconnected(&mut self) {}

    fn on_connection_failed(&mut self, _reason: &str, _attempt: usize, _max: Option<usize>) {}

    fn on_retry_exhausted(&mut self, _attempts: usize) {}
}
