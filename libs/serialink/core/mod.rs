//! # SeriaLink Core
//!
//! The engine of the library: connection manager, frame decoder, atomic
//! state machine, serial transport, and the builder that wires them up.
//!
//! ## Example
//!
//! ```rust,ignore
//! use serialink::{EventSink, FixedInterval, Message};
//! use std::time::Duration;
//!
//! struct Printer;
//!
//! impl EventSink for Printer {
//!     fn on_data_received(&mut self, message: Message) {
//!         println!("data: {}", message);
//!     }
//!     fn on_disconnected(&mut self) {}
//!     fn on_reconnected(&mut self) {}
//!     fn on_connection_failed(&mut self, reason: &str, attempt: usize, max: Option<usize>) {
//!         eprintln!("attempt {attempt}/{max:?} failed: {reason}");
//!     }
//!     fn on_retry_exhausted(&mut self, attempts: usize) {
//!         eprintln!("gave up after {attempts} attempts");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> serialink::Result<()> {
//!     let manager = serialink::builder()
//!         .sink(Printer)
//!         .retry_policy(FixedInterval::new(Duration::from_secs(3), Some(5)))
//!         .build();
//!
//!     manager.open("/dev/ttyUSB0", 9600).await?;
//!     manager.send("ON")?;
//!     // ... consume events through the sink ...
//!     manager.close().await
//! }
//! ```

pub mod builder;
pub mod config;
pub mod connection_state;
pub mod decoder;
pub mod manager;
pub mod serial;

// Re-export main types
pub use builder::{states, LinkBuilder};
pub use config::LinkConfig;
pub use connection_state::{
    AtomicConnectionState, ConnectionState, LinkMetrics, MetricsSnapshot, RetryCounter,
};
pub use decoder::{FrameDecoder, Message};
pub use manager::ConnectionManager;
pub use serial::{SerialChannel, SerialProvider};

// Re-export traits for convenience
pub use crate::traits::*;

/// Create a new link builder
///
/// Convenience entry point for the builder pattern.
pub fn builder() -> LinkBuilder<builder::states::NoSink> {
    LinkBuilder::new()
}
