//! Actuator commands
//!
//! The device understands short ASCII tokens; the link layer appends the
//! newline terminator.

/// Commands for the device's actuator (the LED on the reference firmware)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    On,
    Off,
}

impl ActuatorCommand {
    /// Wire token for this command
    pub fn token(&self) -> &'static str {
        match self {
            ActuatorCommand::On => "ON",
            ActuatorCommand::Off => "OFF",
        }
    }

    /// The opposite command
    pub fn toggled(&self) -> Self {
        match self {
            ActuatorCommand::On => ActuatorCommand::Off,
            ActuatorCommand::Off => ActuatorCommand::On,
        }
    }

    /// Parse an operator-supplied name (`on`/`off`, any case)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "on" => Some(ActuatorCommand::On),
            "off" => Some(ActuatorCommand::Off),
            _ => None,
        }
    }
}
