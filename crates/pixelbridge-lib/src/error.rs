//! Unified error type for the pixelbridge-lib crate.
//!
//! [`BridgeError`] wraps the module-specific `ClientError` and domain-specific
//! error kinds (`Config`, `Color`). `From` impls allow `?` to propagate across
//! module boundaries seamlessly.

use std::fmt;

use crate::client::ClientError;

/// Unified error type for pixelbridge-lib operations.
#[derive(Debug)]
pub enum BridgeError {
    /// Device communication error (HTTP transport, status, payload decode).
    Client(ClientError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Client(e) => write!(f, "{e}"),
            BridgeError::Io(e) => write!(f, "I/O error: {e}"),
            BridgeError::Config(e) => write!(f, "Config error: {e}"),
            BridgeError::Color(e) => write!(f, "Color error: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Client(e) => Some(e),
            BridgeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClientError> for BridgeError {
    fn from(e: ClientError) -> Self {
        BridgeError::Client(e)
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::Io(e)
    }
}

/// Crate-level Result alias using [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;
