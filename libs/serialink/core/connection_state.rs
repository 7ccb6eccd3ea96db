//! Atomic connection state and counters
//!
//! The connection state is the single authoritative description of the
//! link. Every loop and every public operation reads and writes it through
//! this module, replacing the ad hoc `running`/`connecting` flag pairs that
//! make inconsistent combinations possible.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

/// Connection state of a link manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// No link; nothing in flight
    Disconnected = 0,
    /// A manual open is in progress
    Connecting = 1,
    /// The link is live and the read loop is running
    Connected = 2,
    /// The retry driver is attempting to re-establish the link
    Reconnecting = 3,
    /// The retry driver gave up; terminal until a manual open
    Exhausted = 4,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Reconnecting,
            4 => ConnectionState::Exhausted,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Lock-free holder for [`ConnectionState`]
pub struct AtomicConnectionState(AtomicU8);

impl AtomicConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    #[inline]
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Transition from an expected state, atomically
    ///
    /// Returns `true` if the state was `from` and is now `to`. This is the
    /// guard that keeps concurrent `open()` calls from racing each other.
    pub fn try_transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }

    #[inline]
    pub fn is_disconnected(&self) -> bool {
        self.get() == ConnectionState::Disconnected
    }

    #[inline]
    pub fn is_reconnecting(&self) -> bool {
        self.get() == ConnectionState::Reconnecting
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.get() == ConnectionState::Exhausted
    }
}

/// Bounded reopen-attempt counter
///
/// Advanced only by the retry driver; reset to zero on every successful
/// connection. Never exceeds the policy's attempt bound because the driver
/// asks the policy before advancing.
pub struct RetryCounter(AtomicUsize);

impl RetryCounter {
    pub fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    /// Increment and return the new attempt number
    #[inline]
    pub fn advance(&self) -> usize {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

impl Default for RetryCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Atomic counters for link activity
pub struct LinkMetrics {
    messages_received: AtomicU64,
    commands_sent: AtomicU64,
    reconnects: AtomicU64,
}

impl LinkMetrics {
    pub fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            commands_sent: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn increment_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_sent(&self) {
        self.commands_sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_reconnects(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn commands_sent(&self) -> u64 {
        self.commands_sent.load(Ordering::Relaxed)
    }

    pub fn reconnects(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }
}

impl Default for LinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time metrics snapshot
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub commands_sent: u64,
    pub reconnects: u64,
    pub connection_state: ConnectionState,
}
