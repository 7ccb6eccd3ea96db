//! Sensor Monitor - Main Library
//!
//! Re-exports the workspace libraries behind one crate:
//!
//! - **serialink**: the resilient serial-link client (framing,
//!   reconnection, ordered event delivery)
//! - **sensormon**: the consumer layer (reading parser, monitor sink,
//!   configuration, shutdown)
//!
//! Binaries under `src/bin/` wire the two together.

// Re-export workspace libraries for convenience
pub use sensormon;
pub use serialink;
