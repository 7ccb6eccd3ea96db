//! Event sink retaining sensor state
//!
//! `MonitorSink` is the consumer half of the link: it interprets decoded
//! payloads, keeps a bounded history of samples plus a snapshot of the
//! connection, and logs lifecycle transitions. Parse failures are counted
//! and logged locally; they never feed back into the link.

use crate::readings::{SensorMessage, SensorReading};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serialink::{EventSink, Message};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A retained sample with its arrival time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingSample {
    pub at: DateTime<Utc>,
    pub reading: SensorReading,
}

/// Shared view of everything the sink has observed
#[derive(Debug, Default)]
pub struct MonitorSnapshot {
    pub connected: bool,
    pub last_reading: Option<ReadingSample>,
    pub history: VecDeque<ReadingSample>,
    pub sensor_faults: u64,
    pub parse_errors: u64,
    pub last_failure: Option<String>,
}

/// [`EventSink`] implementation for the sensor monitor
pub struct MonitorSink {
    shared: Arc<RwLock<MonitorSnapshot>>,
    history_capacity: usize,
}

impl MonitorSink {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            shared: Arc::new(RwLock::new(MonitorSnapshot::default())),
            history_capacity,
        }
    }

    /// Handle to the shared snapshot; clone it before moving the sink
    /// into the link builder.
    pub fn shared(&self) -> Arc<RwLock<MonitorSnapshot>> {
        Arc::clone(&self.shared)
    }
}

impl EventSink for MonitorSink {
    fn on_data_received(&mut self, message: Message) {
        match SensorMessage::parse(message.as_str()) {
            Ok(SensorMessage::Reading(reading)) => {
                debug!(
                    "Reading: {:.1} C, {:.1} %",
                    reading.temperature, reading.humidity
                );
                let sample = ReadingSample {
                    at: Utc::now(),
                    reading,
                };
                let mut state = self.shared.write();
                state.last_reading = Some(sample);
                state.history.push_back(sample);
                while state.history.len() > self.history_capacity {
                    state.history.pop_front();
                }
            }
            Ok(SensorMessage::Fault) => {
                warn!("Device reported a sensor fault");
                self.shared.write().sensor_faults += 1;
            }
            Err(e) => {
                warn!("Discarding malformed payload {:?}: {}", message.as_str(), e);
                self.shared.write().parse_errors += 1;
            }
        }
    }

    fn on_disconnected(&mut self) {
        warn!("Device disconnected");
        let mut state = self.shared.write();
        state.connected = false;
        // Stale values must not be mistaken for live ones
        state.last_reading = None;
    }

    fn on_reconnected(&mut self) {
        info!("Device connected");
        let mut state = self.shared.write();
        state.connected = true;
        state.last_failure = None;
    }

    fn on_connection_failed(&mut self, reason: &str, attempt: usize, max: Option<usize>) {
        match max {
            Some(max) if attempt > 0 => {
                warn!("Reconnect attempt {}/{} failed: {}", attempt, max, reason)
            }
            _ => warn!("Connection failed: {}", reason),
        }
        self.shared.write().last_failure = Some(reason.to_string());
    }

    fn on_retry_exhausted(&mut self, attempts: usize) {
        error!(
            "Giving up after {} attempts; reconnect manually",
            attempts
        );
    }
}
