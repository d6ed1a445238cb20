//! Per-service strategies for [`crate::protocol::atom::AtomClient`].
//!
//! The client owns the protocol flow; a profile only answers the questions
//! where services disagree. Hooks with defaults are optional.

use crate::auth::{AuthSigner, BasicSigner, BearerSigner, WsseSigner};
use crate::document::Element;
use crate::protocol::atom::AtomVersion;
use crate::protocol::{BlogPost, ProtocolCapabilities};

use std::sync::Arc;

pub const BLOGGER_CATEGORY_SCHEME: &str = "http://www.blogger.com/atom/ns#";
pub const BLOGGER_KIND_SCHEME: &str = "http://schemas.google.com/g/2005#kind";
pub const BLOGGER_KIND_POST: &str = "http://schemas.google.com/blogger/2008/kind#post";

const BLOGGER_FEED_BASE: &str = "https://www.blogger.com/feeds/";

pub trait AtomProfile: Send + Sync {
    fn name(&self) -> &'static str;

    fn version(&self) -> AtomVersion;

    fn capabilities(&self) -> &ProtocolCapabilities;

    /// Scheme of the categories this service manages. `None` disables
    /// scheme-filtered category handling on 1.0 dialects.
    fn category_scheme(&self) -> Option<&str>;

    fn signer(&self) -> Arc<dyn AuthSigner>;

    /// Last chance to edit an outgoing entry, after the generic build and
    /// before signing.
    fn decorate_entry(&self, _entry: &mut Element, _post: &BlogPost) {}

    /// Map a user-facing blog id onto the collection URI.
    fn fixup_blog_id(&self, blog_id: &str) -> String {
        blog_id.to_string()
    }

    /// List this collection ahead of the others in `get_blogs`.
    fn should_promote(&self, _collection: &Element) -> bool {
        false
    }
}

/// Plain Atom Publishing Protocol 1.0 with Basic auth.
pub struct GenericAtomProfile {
    category_scheme: Option<String>,
    capabilities: ProtocolCapabilities,
    signer: Arc<dyn AuthSigner>,
}

impl GenericAtomProfile {
    pub fn new(category_scheme: Option<String>) -> Self {
        Self {
            category_scheme,
            capabilities: ProtocolCapabilities {
                supports_categories: true,
                supports_multiple_categories: true,
                supports_new_categories: true,
                supports_post_as_draft: true,
                supports_custom_date: true,
                supports_excerpt: true,
                supports_slug: true,
            },
            signer: Arc::new(BasicSigner),
        }
    }
}

impl AtomProfile for GenericAtomProfile {
    fn name(&self) -> &'static str {
        "atom"
    }

    fn version(&self) -> AtomVersion {
        AtomVersion::V10
    }

    fn capabilities(&self) -> &ProtocolCapabilities {
        &self.capabilities
    }

    fn category_scheme(&self) -> Option<&str> {
        // An unconfigured scheme matches categories without one.
        Some(self.category_scheme.as_deref().unwrap_or_default())
    }

    fn signer(&self) -> Arc<dyn AuthSigner> {
        Arc::clone(&self.signer)
    }
}

/// Blogger's draft-era Atom API, authenticated with an OAuth bearer token.
pub struct BloggerAtomProfile {
    capabilities: ProtocolCapabilities,
    signer: Arc<dyn AuthSigner>,
}

impl Default for BloggerAtomProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl BloggerAtomProfile {
    pub fn new() -> Self {
        Self {
            capabilities: ProtocolCapabilities {
                supports_categories: true,
                supports_multiple_categories: true,
                supports_new_categories: true,
                supports_post_as_draft: true,
                supports_custom_date: true,
                supports_excerpt: false,
                supports_slug: false,
            },
            signer: Arc::new(BearerSigner),
        }
    }
}

impl AtomProfile for BloggerAtomProfile {
    fn name(&self) -> &'static str {
        "blogger-atom"
    }

    fn version(&self) -> AtomVersion {
        AtomVersion::V10DraftBlogger
    }

    fn capabilities(&self) -> &ProtocolCapabilities {
        &self.capabilities
    }

    fn category_scheme(&self) -> Option<&str> {
        Some(BLOGGER_CATEGORY_SCHEME)
    }

    fn signer(&self) -> Arc<dyn AuthSigner> {
        Arc::clone(&self.signer)
    }

    fn decorate_entry(&self, entry: &mut Element, _post: &BlogPost) {
        let version = self.version();
        version.remove_categories(entry, Some(BLOGGER_KIND_SCHEME));
        entry.push(version.category_element(BLOGGER_KIND_POST, Some(BLOGGER_KIND_SCHEME), ""));
    }

    /// Bare numeric ids become the blog's post feed.
    fn fixup_blog_id(&self, blog_id: &str) -> String {
        if !blog_id.is_empty() && blog_id.bytes().all(|b| b.is_ascii_digit()) {
            format!("{BLOGGER_FEED_BASE}{blog_id}/posts/default")
        } else {
            blog_id.to_string()
        }
    }

    fn should_promote(&self, collection: &Element) -> bool {
        collection
            .attr("href")
            .is_some_and(|href| href.trim_end_matches('/').ends_with("/posts/default"))
    }
}

/// Atom 0.3 feeds behind WSSE UsernameToken auth.
pub struct WsseAtomProfile {
    capabilities: ProtocolCapabilities,
    signer: Arc<dyn AuthSigner>,
}

impl Default for WsseAtomProfile {
    fn default() -> Self {
        Self::new(WsseSigner::new())
    }
}

impl WsseAtomProfile {
    pub fn new(signer: WsseSigner) -> Self {
        Self {
            capabilities: ProtocolCapabilities {
                supports_categories: true,
                supports_multiple_categories: true,
                supports_new_categories: true,
                supports_post_as_draft: false,
                supports_custom_date: true,
                supports_excerpt: true,
                supports_slug: false,
            },
            signer: Arc::new(signer),
        }
    }
}

impl AtomProfile for WsseAtomProfile {
    fn name(&self) -> &'static str {
        "wsse-atom"
    }

    fn version(&self) -> AtomVersion {
        AtomVersion::V03
    }

    fn capabilities(&self) -> &ProtocolCapabilities {
        &self.capabilities
    }

    fn category_scheme(&self) -> Option<&str> {
        None
    }

    fn signer(&self) -> Arc<dyn AuthSigner> {
        Arc::clone(&self.signer)
    }
}
