//! Errors from the redirect-following request executor.
//!
//! Key design decisions:
//! - Terminal non-2xx responses are NOT errors here; they come back as data
//! - Transport failures keep the timeout/connect flags from reqwest
//! - All errors include ErrorLocation for debugging

use crate::error::AuthError;

use common::{ErrorLocation, HttpStatusCode};

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ExecutorError {
    #[error("Invalid Redirect Error: HTTP {status} from {uri} has no usable Location {location}")]
    InvalidRedirect {
        uri: String,
        status: HttpStatusCode,
        location: ErrorLocation,
    },

    #[error("Redirect Limit Exceeded Error: more than {limit} redirects starting at {uri} {location}")]
    RedirectLimitExceeded {
        uri: String,
        limit: usize,
        location: ErrorLocation,
    },

    #[error("Cancelled Error: request chain for {uri} was cancelled {location}")]
    Cancelled { uri: String, location: ErrorLocation },

    #[error("Transport Error: {uri}: {message} {location}")]
    Transport {
        uri: String,
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("Client Build Error: {message} {location}")]
    ClientBuild {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ExecutorError {
    #[track_caller]
    pub fn invalid_redirect(uri: impl Into<String>, status: HttpStatusCode) -> Self {
        ExecutorError::InvalidRedirect {
            uri: uri.into(),
            status,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn redirect_limit_exceeded(uri: impl Into<String>, limit: usize) -> Self {
        ExecutorError::RedirectLimitExceeded {
            uri: uri.into(),
            limit,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn cancelled(uri: impl Into<String>) -> Self {
        ExecutorError::Cancelled {
            uri: uri.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn client_build(message: impl Into<String>) -> Self {
        ExecutorError::ClientBuild {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    /// Create from reqwest error, categorizing BEFORE converting to string.
    #[track_caller]
    pub fn from_reqwest(uri: impl Into<String>, error: &reqwest::Error) -> Self {
        ExecutorError::Transport {
            uri: uri.into(),
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::caller(),
        }
    }

    /// Advisory only. The executor itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExecutorError::Transport {
                is_timeout,
                is_connection,
                ..
            } => *is_timeout || *is_connection,
            ExecutorError::InvalidRedirect { .. } => false,
            ExecutorError::RedirectLimitExceeded { .. } => false,
            ExecutorError::Cancelled { .. } => false,
            ExecutorError::ClientBuild { .. } => false,
            ExecutorError::UrlParse { .. } => false,
            ExecutorError::Auth(_) => false,
        }
    }
}

impl From<url::ParseError> for ExecutorError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ExecutorError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<reqwest::Error> for ExecutorError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        let uri = error.url().map(|u| u.to_string()).unwrap_or_default();
        ExecutorError::from_reqwest(uri, &error)
    }
}
