//! # SeriaLink Traits
//!
//! Core traits and types for the SeriaLink serial client library.
//!
//! These are the pluggable seams of the library:
//!
//! - **ChannelProvider / Channel**: the device boundary (how links are
//!   opened, read, written and enumerated)
//! - **EventSink**: the consumer-side capability invoked with decoded
//!   messages and lifecycle transitions
//! - **RetryPolicy**: how the manager behaves after a link is lost

pub mod channel;
pub mod error;
pub mod reconnect;
pub mod sink;

// Re-export commonly used types
pub use channel::{Channel, ChannelProvider, DeviceInfo};
pub use error::{LinkError, Result};
pub use reconnect::{Backoff, FixedInterval, NoRetry, RetryPolicy};
pub use sink::{EventSink, NoOpSink};
