use blogwire_core::error::{ConfigError, ProtocolError};

use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the probe binary.
///
/// Library errors are flattened to strings so a failed account can be
/// written into the JSON report next to the successful ones.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ProbeError {
    /// Error from the probe itself (logging, directories)
    #[error("Probe Error: {message} {location}")]
    Probe {
        message: String,
        location: ErrorLocation,
    },

    /// `blogwire.toml` could not be loaded
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// A protocol client call failed
    #[error("Protocol Error: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },
}

impl From<ConfigError> for ProbeError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        ProbeError::Config {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<ProtocolError> for ProbeError {
    #[track_caller]
    fn from(error: ProtocolError) -> Self {
        ProbeError::Protocol {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
