// Unit tests for the XML tree: namespace resolution and serialization

use crate::document::{Element, ns, parse};
use crate::error::DocumentError;

const ENTRY: &str = r#"<?xml version="1.0"?>
<a:entry xmlns:a="http://www.w3.org/2005/Atom" xmlns:app="http://www.w3.org/2007/app">
  <a:title type="text">Tom &amp; Jerry</a:title>
  <a:content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>Hi <b>there</b></p></div></a:content>
  <app:control><app:draft>yes</app:draft></app:control>
  <!-- ignored -->
  <a:link rel="edit" href="/entries/1"/>
</a:entry>"#;

/// **VALUE**: Prefixes are irrelevant after parsing; only namespace URIs count.
#[test]
fn given_prefixed_entry_when_parsed_then_elements_resolve_to_namespace_uris() {
    // WHEN
    let entry = parse(ENTRY).expect("well-formed");

    // THEN
    assert!(entry.is(ns::ATOM_10, "entry"));
    assert_eq!(entry.child_text(ns::ATOM_10, "title").as_deref(), Some("Tom & Jerry"));
    assert_eq!(
        entry.child(ns::ATOM_10, "title").and_then(|t| t.attr("type")),
        Some("text")
    );
    let draft = entry
        .child(ns::APP_10, "control")
        .and_then(|c| c.child_text(ns::APP_10, "draft"));
    assert_eq!(draft.as_deref(), Some("yes"));
    assert_eq!(
        entry.child(ns::ATOM_10, "link").and_then(|l| l.attr("href")),
        Some("/entries/1")
    );
}

#[test]
fn given_xhtml_div_when_inner_xml_then_children_serialize_without_namespace_noise() {
    let entry = parse(ENTRY).expect("well-formed");
    let div = entry
        .child(ns::ATOM_10, "content")
        .and_then(|c| c.child(ns::XHTML, "div"))
        .expect("div");

    assert_eq!(div.inner_xml(), "<p>Hi <b>there</b></p>");
}

#[test]
fn given_simple_entry_when_to_xml_then_root_namespace_is_default() {
    let entry = Element::in_ns(ns::ATOM_10, "entry")
        .with_child(Element::in_ns(ns::ATOM_10, "title").with_text("Hi"));

    assert_eq!(
        entry.to_xml(),
        r#"<?xml version="1.0" encoding="utf-8"?><entry xmlns="http://www.w3.org/2005/Atom"><title>Hi</title></entry>"#
    );
}

/// **VALUE**: Built documents survive a trip through the parser.
///
/// **BUG THIS CATCHES**: Missing prefix declarations or unescaped text would
/// make services reject the entry as malformed.
#[test]
fn given_mixed_namespaces_and_special_text_when_serialized_then_parses_back() {
    // GIVEN
    let entry = Element::in_ns(ns::ATOM_10, "entry")
        .with_child(Element::in_ns(ns::ATOM_10, "title").with_text("a < b & \"c\""))
        .with_child(
            Element::in_ns(ns::APP_10, "control")
                .with_child(Element::in_ns(ns::APP_10, "draft").with_text("yes")),
        )
        .with_child(Element::in_ns(ns::DC, "subject").with_text("rust"));

    // WHEN
    let xml = entry.to_xml();
    let parsed = parse(&xml).expect("round trip");

    // THEN
    assert!(xml.contains(r#"xmlns:app="http://www.w3.org/2007/app""#), "{xml}");
    assert!(xml.contains("<app:control><app:draft>yes</app:draft></app:control>"), "{xml}");
    assert!(xml.contains("a &lt; b &amp;"), "{xml}");
    assert_eq!(parsed, entry);
}

#[test]
fn given_unprefixed_child_under_default_namespace_when_serialized_then_namespace_is_reset() {
    let root = Element::in_ns(ns::ATOM_10, "feed").with_child(Element::new(None, "plain"));

    let parsed = parse(&root.to_xml()).expect("round trip");

    assert_eq!(parsed.elements().next().and_then(Element::namespace), None);
}

#[test]
fn given_undeclared_prefix_when_parsed_then_parse_error() {
    let result = parse("<x:entry/>");

    assert!(matches!(result, Err(DocumentError::Parse { .. })));
}

#[test]
fn given_no_root_element_when_parsed_then_parse_error() {
    assert!(matches!(parse("   "), Err(DocumentError::Parse { .. })));
}

#[test]
fn given_element_when_retain_elements_then_text_nodes_are_kept() {
    let mut element = Element::in_ns(ns::ATOM_10, "entry")
        .with_text("lead")
        .with_child(Element::in_ns(ns::ATOM_10, "category"))
        .with_child(Element::in_ns(ns::ATOM_10, "title"));

    element.remove_children(ns::ATOM_10, "category");

    assert_eq!(element.elements().count(), 1);
    assert_eq!(element.text(), "lead");
}
