use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DocumentError {
    #[error("XML Parse Error: {message} {location}")]
    Parse {
        message: String,
        location: ErrorLocation,
    },

    #[error("XML Structure Error: {message} {location}")]
    Structure {
        message: String,
        location: ErrorLocation,
    },
}

impl DocumentError {
    #[track_caller]
    pub fn parse(message: impl Into<String>) -> Self {
        DocumentError::Parse {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn structure(message: impl Into<String>) -> Self {
        DocumentError::Structure {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<quick_xml::Error> for DocumentError {
    #[track_caller]
    fn from(error: quick_xml::Error) -> Self {
        DocumentError::parse(error.to_string())
    }
}
