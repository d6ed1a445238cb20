//! Prose content tagged with its representation.
//!
//! A [`ContentValue`] is built once from a fetched or authored string and can
//! then be read back as any [`ContentKind`]. Conversions are pure:
//!
//! | stored \ wanted | Text            | HTML      | XHTML          |
//! |-----------------|-----------------|-----------|----------------|
//! | Text            | as is           | escaped   | ConversionError|
//! | HTML            | markup stripped | as is     | ConversionError|
//! | XHTML           | markup stripped | as is     | as is          |
//!
//! A value without content (`raw == None`) converts to `None` for every
//! target, including the ones that would otherwise fail.

mod markup;

pub use markup::{escape_html, markup_to_text};

use crate::error::ContentError;

use std::fmt;

/// Representation of a piece of prose content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Html,
    Xhtml,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Text => write!(f, "text"),
            ContentKind::Html => write!(f, "html"),
            ContentKind::Xhtml => write!(f, "xhtml"),
        }
    }
}

/// Immutable content plus the kind it was stored as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentValue {
    kind: ContentKind,
    raw: Option<String>,
}

impl ContentValue {
    pub fn new(kind: ContentKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: Some(raw.into()),
        }
    }

    /// A value of `kind` with no content at all.
    pub fn absent(kind: ContentKind) -> Self {
        Self { kind, raw: None }
    }

    pub fn from_option(kind: ContentKind, raw: Option<String>) -> Self {
        Self { kind, raw }
    }

    pub fn text(raw: impl Into<String>) -> Self {
        Self::new(ContentKind::Text, raw)
    }

    pub fn html(raw: impl Into<String>) -> Self {
        Self::new(ContentKind::Html, raw)
    }

    pub fn xhtml(raw: impl Into<String>) -> Self {
        Self::new(ContentKind::Xhtml, raw)
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Render the content as `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Conversion`] when XHTML is requested from text
    /// or HTML content. HTML is not guaranteed to be well-formed XML, and text
    /// has no markup to present.
    pub fn get_value(&self, target: ContentKind) -> Result<Option<String>, ContentError> {
        match target {
            ContentKind::Text => Ok(self.to_text()),
            ContentKind::Html => Ok(self.to_html()),
            ContentKind::Xhtml => match (self.kind, &self.raw) {
                (_, None) => Ok(None),
                (ContentKind::Xhtml, Some(raw)) => Ok(Some(raw.clone())),
                (from, Some(_)) => Err(ContentError::conversion(from, ContentKind::Xhtml)),
            },
        }
    }

    /// Plain text rendering. Never fails.
    pub fn to_text(&self) -> Option<String> {
        let raw = self.raw.as_deref()?;
        Some(match self.kind {
            ContentKind::Text => raw.to_string(),
            ContentKind::Html | ContentKind::Xhtml => markup_to_text(raw),
        })
    }

    /// HTML rendering. Never fails; XHTML is already valid HTML.
    pub fn to_html(&self) -> Option<String> {
        let raw = self.raw.as_deref()?;
        Some(match self.kind {
            ContentKind::Text => escape_html(raw),
            ContentKind::Html | ContentKind::Xhtml => raw.to_string(),
        })
    }
}
