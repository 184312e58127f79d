//! Delivery error type.
//!
//! Kept as a plain enum (not anyhow) so callers can fold every failure into
//! the single user-visible failure message while the detail goes to the log.

use std::fmt;

/// Error raised by one delivery attempt.
#[derive(Debug)]
pub enum DeliveryError {
    /// The payload could not be encoded as JSON.
    Encode(serde_json::Error),
    /// Curl reported a transport error (connect refused, DNS, timeout).
    Transport(curl::Error),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Encode(e) => write!(f, "payload encoding failed: {}", e),
            DeliveryError::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeliveryError::Encode(e) => Some(e),
            DeliveryError::Transport(e) => Some(e),
        }
    }
}

impl From<curl::Error> for DeliveryError {
    fn from(e: curl::Error) -> Self {
        DeliveryError::Transport(e)
    }
}

impl From<serde_json::Error> for DeliveryError {
    fn from(e: serde_json::Error) -> Self {
        DeliveryError::Encode(e)
    }
}
