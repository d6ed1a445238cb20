//! Dialect differences between the Atom revisions services still speak.
//!
//! | version            | atom ns                       | control ns                  | categories            |
//! |--------------------|-------------------------------|-----------------------------|-----------------------|
//! | `V03`              | `http://purl.org/atom/ns#`    | `http://example.net/appns/` | `dc:subject`          |
//! | `V10`              | `http://www.w3.org/2005/Atom` | `http://www.w3.org/2007/app`| `atom:category`       |
//! | `V10Draft`         | 1.0                           | `http://purl.org/atom/app#` | `atom:category`       |
//! | `V10DraftBlogger`  | 1.0                           | `http://purl.org/atom/app#` | `atom:category`, no label |

use crate::content::ContentValue;
use crate::document::{Element, ns};
use crate::error::DocumentError;
use crate::protocol::Category;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomVersion {
    V03,
    V10,
    V10Draft,
    V10DraftBlogger,
}

impl AtomVersion {
    /// Namespace of feeds, entries and their children.
    pub fn namespace(self) -> &'static str {
        match self {
            AtomVersion::V03 => ns::ATOM_03,
            _ => ns::ATOM_10,
        }
    }

    /// Namespace of service documents (`service`, `workspace`, `collection`).
    pub fn service_namespace(self) -> &'static str {
        match self {
            AtomVersion::V10 => ns::APP_10,
            _ => ns::APP_DRAFT,
        }
    }

    /// Namespace of `control`/`draft` inside entries.
    pub fn control_namespace(self) -> &'static str {
        match self {
            AtomVersion::V03 => ns::APP_03,
            AtomVersion::V10 => ns::APP_10,
            AtomVersion::V10Draft | AtomVersion::V10DraftBlogger => ns::APP_DRAFT,
        }
    }

    pub fn updated_element(self) -> &'static str {
        match self {
            AtomVersion::V03 => "modified",
            _ => "updated",
        }
    }

    pub fn published_element(self) -> &'static str {
        match self {
            AtomVersion::V03 => "issued",
            _ => "published",
        }
    }

    pub fn category_element(self, term: &str, scheme: Option<&str>, label: &str) -> Element {
        if self == AtomVersion::V03 {
            return Element::in_ns(ns::DC, "subject").with_text(term);
        }

        let mut element = Element::in_ns(self.namespace(), "category").with_attr("term", term);
        if let Some(scheme) = scheme.filter(|s| !s.is_empty()) {
            element.set_attr("scheme", scheme);
        }
        // Blogger rejects entries whose categories carry labels.
        if self != AtomVersion::V10DraftBlogger {
            element.set_attr("label", label);
        }
        element
    }

    /// Drop the categories of `scheme` from `entry`.
    ///
    /// A missing scheme attribute counts as the empty scheme. With
    /// `scheme == None` 1.0 entries are left alone.
    pub fn remove_categories(self, entry: &mut Element, scheme: Option<&str>) {
        if self == AtomVersion::V03 {
            entry.remove_children(ns::DC, "subject");
            return;
        }
        let Some(scheme) = scheme else {
            return;
        };

        let atom = self.namespace();
        entry.retain_elements(|e| {
            !(e.is(atom, "category") && e.attr("scheme").unwrap_or_default() == scheme)
        });
    }

    pub fn extract_categories(self, entry: &Element, scheme: Option<&str>) -> Vec<Category> {
        if self == AtomVersion::V03 {
            return entry
                .children_named(ns::DC, "subject")
                .map(|e| e.text())
                .filter(|subject| !subject.is_empty())
                .map(|subject| Category::new(subject.clone(), subject))
                .collect();
        }
        let Some(scheme) = scheme else {
            return Vec::new();
        };

        entry
            .children_named(self.namespace(), "category")
            .filter(|e| e.attr("scheme").unwrap_or_default() == scheme)
            .filter_map(|e| {
                category_from_terms(
                    e.attr("term").unwrap_or_default(),
                    e.attr("label").unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Decode a text construct (`title`, `summary`, `content`).
    pub fn text_value(self, element: &Element) -> Result<ContentValue, DocumentError> {
        match self {
            AtomVersion::V03 => text_value_03(element),
            _ => Ok(text_value_10(element)),
        }
    }

    /// `content` element carrying escaped HTML.
    pub fn html_content(self, html: &str) -> Element {
        let content = Element::in_ns(self.namespace(), "content");
        match self {
            AtomVersion::V03 => content
                .with_attr("type", "text/html")
                .with_attr("mode", "escaped")
                .with_text(html),
            _ => content.with_attr("type", "html").with_text(html),
        }
    }
}

/// Term falls back to label and label to term; both empty is no category.
pub(crate) fn category_from_terms(term: &str, label: &str) -> Option<Category> {
    match (term.is_empty(), label.is_empty()) {
        (true, true) => None,
        (true, false) => Some(Category::new(label, label)),
        (false, true) => Some(Category::new(term, term)),
        (false, false) => Some(Category::new(term, label)),
    }
}

fn xhtml_div(element: &Element) -> ContentValue {
    match element.child(ns::XHTML, "div") {
        Some(div) => ContentValue::xhtml(div.inner_xml()),
        None => ContentValue::xhtml(""),
    }
}

fn text_value_10(element: &Element) -> ContentValue {
    match element.attr("type").unwrap_or("text") {
        "html" => ContentValue::html(element.text().trim()),
        "xhtml" => xhtml_div(element),
        _ => ContentValue::text(element.text().trim()),
    }
}

fn text_value_03(element: &Element) -> Result<ContentValue, DocumentError> {
    let mut mime = element.attr("type").unwrap_or_default().to_string();
    let mode = element.attr("mode").filter(|m| !m.is_empty()).unwrap_or("xml");
    let has_markup = element.elements().next().is_some();

    let content = match mode {
        "escaped" => element.text(),
        "base64" => {
            let bytes = STANDARD
                .decode(element.text().trim())
                .map_err(|e| DocumentError::structure(format!("invalid base64 content: {e}")))?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        _ => {
            if mime.is_empty() && has_markup {
                mime = "application/xhtml+xml".to_string();
            }
            if has_markup {
                element.inner_xml()
            } else {
                element.text()
            }
        }
    };

    Ok(match mime.as_str() {
        "text/html" => ContentValue::html(content),
        "application/xhtml+xml" if mode == "xml" && element.child(ns::XHTML, "div").is_some() => {
            xhtml_div(element)
        }
        "application/xhtml+xml" => ContentValue::xhtml(content),
        _ => ContentValue::text(content),
    })
}
