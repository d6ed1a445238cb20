use crate::content::ContentKind;

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ContentError {
    /// The stored kind cannot be presented as the requested kind.
    #[error("Conversion Error: {from} content cannot be converted to {to} {location}")]
    Conversion {
        from: ContentKind,
        to: ContentKind,
        location: ErrorLocation,
    },
}

impl ContentError {
    #[track_caller]
    pub fn conversion(from: ContentKind, to: ContentKind) -> Self {
        ContentError::Conversion {
            from,
            to,
            location: ErrorLocation::caller(),
        }
    }
}
