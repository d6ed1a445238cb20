use crate::error::{AuthError, ContentError, DocumentError, ExecutorError};

use common::{ErrorLocation, HttpStatusCode};

use thiserror::Error as ThisError;

/// Longest response body excerpt kept on an [`ProtocolError::HttpStatus`].
const BODY_SNIPPET_LIMIT: usize = 512;

#[derive(Debug, ThisError)]
pub enum ProtocolError {
    #[error("Unsupported Operation Error: {protocol} does not support {operation} {location}")]
    UnsupportedOperation {
        operation: &'static str,
        protocol: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid Request Error: {message} {location}")]
    InvalidRequest {
        message: String,
        location: ErrorLocation,
    },

    #[error("Remote Protocol Error: {uri}: {message} {location}")]
    RemoteProtocol {
        uri: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Status Error: {uri}: HTTP {status} - {body} {location}")]
    HttpStatus {
        uri: String,
        status: HttpStatusCode,
        body: String,
        location: ErrorLocation,
    },

    #[error("Serialization Error: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ProtocolError {
    #[track_caller]
    pub fn unsupported(protocol: &'static str, operation: &'static str) -> Self {
        ProtocolError::UnsupportedOperation {
            operation,
            protocol,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ProtocolError::InvalidRequest {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn remote(uri: impl Into<String>, message: impl Into<String>) -> Self {
        ProtocolError::RemoteProtocol {
            uri: uri.into(),
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn http_status(uri: impl Into<String>, status: HttpStatusCode, body: &str) -> Self {
        let body = match body.char_indices().nth(BODY_SNIPPET_LIMIT) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        ProtocolError::HttpStatus {
            uri: uri.into(),
            status,
            body,
            location: ErrorLocation::caller(),
        }
    }

    /// HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProtocolError::HttpStatus { status, .. } => Some(status.0),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ProtocolError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ProtocolError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ProtocolError::Serialization {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
