// Unit tests for the per-service Atom hooks

use crate::content::ContentValue;
use crate::document::{Element, ns};
use crate::protocol::BlogPost;
use crate::protocol::atom::{
    AtomProfile, BLOGGER_KIND_POST, BLOGGER_KIND_SCHEME, BloggerAtomProfile, GenericAtomProfile,
};

/// **VALUE**: Blogger entries always carry the `kind#post` marker, once.
#[test]
fn given_blogger_profile_when_decorate_entry_twice_then_single_kind_category() {
    // GIVEN
    let profile = BloggerAtomProfile::new();
    let post = BlogPost::new("t", ContentValue::html("<p>x</p>"));
    let mut entry = Element::in_ns(ns::ATOM_10, "entry");

    // WHEN
    profile.decorate_entry(&mut entry, &post);
    profile.decorate_entry(&mut entry, &post);

    // THEN
    let kinds: Vec<_> = entry
        .children_named(ns::ATOM_10, "category")
        .filter(|c| c.attr("scheme") == Some(BLOGGER_KIND_SCHEME))
        .collect();
    assert_eq!(kinds.len(), 1);
    assert_eq!(kinds[0].attr("term"), Some(BLOGGER_KIND_POST));
}

#[test]
fn given_numeric_blog_id_when_blogger_fixup_then_post_feed_url() {
    let profile = BloggerAtomProfile::new();

    assert_eq!(
        profile.fixup_blog_id("12345"),
        "https://www.blogger.com/feeds/12345/posts/default"
    );
    assert_eq!(
        profile.fixup_blog_id("https://example.com/feed"),
        "https://example.com/feed"
    );
}

#[test]
fn given_post_feed_collection_when_blogger_should_promote_then_true() {
    let profile = BloggerAtomProfile::new();
    let posts = Element::in_ns(ns::APP_DRAFT, "collection")
        .with_attr("href", "https://www.blogger.com/feeds/1/posts/default");
    let comments = Element::in_ns(ns::APP_DRAFT, "collection")
        .with_attr("href", "https://www.blogger.com/feeds/1/comments/default");

    assert!(profile.should_promote(&posts));
    assert!(!profile.should_promote(&comments));
}

#[test]
fn given_generic_profile_without_scheme_when_category_scheme_then_empty_scheme() {
    let profile = GenericAtomProfile::new(None);

    assert_eq!(profile.category_scheme(), Some(""));
    assert!(!profile.should_promote(&Element::in_ns(ns::APP_10, "collection")));
}
