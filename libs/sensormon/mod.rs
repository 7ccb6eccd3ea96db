//! # SensorMon
//!
//! Consumer layer for the serial sensor monitor: payload parsing for
//! temperature/humidity readings, the [`EventSink`](serialink::EventSink)
//! implementation that retains them, actuator commands, configuration,
//! logging and shutdown utilities.
//!
//! The link itself (framing, reconnection, event delivery) lives in the
//! `serialink` crate; this crate only interprets what comes out of it.

pub mod commands;
pub mod config;
pub mod logging;
pub mod readings;
pub mod shutdown;
pub mod sink;

pub use commands::ActuatorCommand;
pub use config::{ConfigError, MonitorConfig, ReconnectConfig};
pub use logging::init_tracing;
pub use readings::{ReadingError, SensorMessage, SensorReading};
pub use shutdown::ShutdownManager;
pub use sink::{MonitorSink, MonitorSnapshot, ReadingSample};
