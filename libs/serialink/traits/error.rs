use thiserror::Error;

/// Main error type for serialink
#[derive(Error, Debug)]
pub enum LinkError {
    /// The device could not be opened (absent, busy, bad baud)
    #[error("failed to open device: {0}")]
    Open(String),

    /// I/O failure on a live link
    #[error("device I/O error: {0}")]
    Io(String),

    /// An outbound command was submitted while the link is down
    #[error("not connected")]
    NotConnected,

    /// Reconnection gave up after the configured number of attempts
    #[error("reconnection failed after {attempts} attempts: {reason}")]
    RetriesExhausted { attempts: usize, reason: String },

    /// Operation not valid in the current connection state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Internal channel send error
    #[error("channel send error: {0}")]
    ChannelSend(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for serialink operations
pub type Result<T> = std::result::Result<T, LinkError>;
