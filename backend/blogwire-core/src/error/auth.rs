//! Errors raised while resolving credentials or signing a request.
//!
//! None of these are retryable: a header value with a line break in it will
//! not become safe on the next attempt, and missing credentials are a
//! configuration problem.

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("Header Injection Error: value for '{header}' contains CR or LF {location}")]
    HeaderInjection {
        header: String,
        location: ErrorLocation,
    },

    #[error("Invalid Header Error: '{header}': {message} {location}")]
    InvalidHeader {
        header: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Credentials Unavailable Error: {message} {location}")]
    CredentialsUnavailable {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    #[track_caller]
    pub fn header_injection(header: impl Into<String>) -> Self {
        AuthError::HeaderInjection {
            header: header.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_header(header: impl Into<String>, message: impl Into<String>) -> Self {
        AuthError::InvalidHeader {
            header: header.into(),
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn credentials_unavailable(message: impl Into<String>) -> Self {
        AuthError::CredentialsUnavailable {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
