//! Sensor payload parsing
//!
//! The device emits two payload shapes above the framing layer: the
//! literal `ERROR` token when the sensor itself misreads, and
//! `KEY:value,KEY:value` pairs for readings (`TEMP`, `HUM`). Parsing is
//! pure; a malformed payload is a local parse error and must never be
//! confused with a link fault.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReadingError {
    #[error("malformed field: {0}")]
    MalformedField(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid number for {field}: {value}")]
    InvalidNumber { field: String, value: String },
}

/// One temperature/humidity sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity percentage
    pub humidity: f32,
}

/// A decoded device payload
#[derive(Debug, Clone, PartialEq)]
pub enum SensorMessage {
    /// The device reported a sensor fault (the literal `ERROR` token).
    /// This is data, not a link failure.
    Fault,
    /// A complete reading
    Reading(SensorReading),
}

impl SensorMessage {
    /// Parse a framed, trimmed payload
    pub fn parse(text: &str) -> Result<Self, ReadingError> {
        if text == "ERROR" {
            return Ok(SensorMessage::Fault);
        }

        let mut temperature = None;
        let mut humidity = None;

        for field in text.split(',') {
            let (key, value) = field
                .split_once(':')
                .ok_or_else(|| ReadingError::MalformedField(field.to_string()))?;

            let number: f32 = value.trim().parse().map_err(|_| ReadingError::InvalidNumber {
                field: key.to_string(),
                value: value.trim().to_string(),
            })?;

            match key.trim() {
                "TEMP" => temperature = Some(number),
                "HUM" => humidity = Some(number),
                // Unknown keys are tolerated; firmware may add fields
                _ => {}
            }
        }

        Ok(SensorMessage::Reading(SensorReading {
            temperature: temperature.ok_or(ReadingError::MissingField("TEMP"))?,
            humidity: humidity.ok_or(ReadingError::MissingField("HUM"))?,
        }))
    }
}
