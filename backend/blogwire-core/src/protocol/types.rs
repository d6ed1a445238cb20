use crate::content::ContentValue;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a service variant can do. Fixed when the client is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProtocolCapabilities {
    pub supports_categories: bool,
    pub supports_multiple_categories: bool,
    pub supports_new_categories: bool,
    pub supports_post_as_draft: bool,
    pub supports_custom_date: bool,
    pub supports_excerpt: bool,
    pub supports_slug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogInfo {
    pub id: String,
    pub name: String,
    pub homepage_url: String,
}

/// A post as sent to or read back from a service.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    /// Service-assigned id; `None` until the post exists remotely.
    pub id: Option<String>,
    pub title: String,
    pub contents: ContentValue,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub categories: Vec<Category>,
    pub date_published: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub etag: Option<String>,
    /// `false` saves as draft where drafts are supported.
    pub publish: bool,
}

impl BlogPost {
    pub fn new(title: impl Into<String>, contents: ContentValue) -> Self {
        Self {
            id: None,
            title: title.into(),
            contents,
            excerpt: None,
            slug: None,
            categories: Vec::new(),
            date_published: None,
            permalink: None,
            etag: None,
            publish: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostResult {
    pub post_id: String,
    pub etag: Option<String>,
    /// The post as the service stored it, when the response carried it.
    pub remote_post: Option<BlogPost>,
}
