//! # SeriaLink
//!
//! A resilient serial-link client for line-oriented devices.
//!
//! ## Features
//!
//! - **Owned link lifecycle**: one manager per device, explicit open/close
//! - **Delimited-text framing**: arbitrary byte chunks in, ordered messages out
//! - **Bounded auto-reconnection**: pluggable retry policies, exhaustion reporting
//! - **Ordered event delivery**: one dispatcher thread, callbacks never concurrent
//! - **Atomic state machine**: a single connection state, no ad hoc flags

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core functionality
pub use self::core::{
    builder, config, connection_state, decoder, manager, serial,
    builder::LinkBuilder,
    config::LinkConfig,
    connection_state::{AtomicConnectionState, ConnectionState, LinkMetrics, MetricsSnapshot},
    decoder::{FrameDecoder, Message},
    manager::ConnectionManager,
    serial::{SerialChannel, SerialProvider},
};

/// Type alias for Result with LinkError
pub type Result<T> = std::result::Result<T, traits::LinkError>;
