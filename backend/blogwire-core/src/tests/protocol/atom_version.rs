// Unit tests for Atom dialect handling: text constructs and categories

use crate::content::ContentKind;
use crate::document::{Element, ns, parse};
use crate::protocol::Category;
use crate::protocol::atom::AtomVersion;

const SCHEME: &str = "http://example.com/tags";

fn element(xml: &str) -> Element {
    parse(xml).expect("well-formed")
}

#[test]
fn given_atom10_html_title_when_text_value_then_html_kind_trimmed() {
    let title = element(
        r#"<title xmlns="http://www.w3.org/2005/Atom" type="html">  &lt;b&gt;Bold&lt;/b&gt; </title>"#,
    );

    let value = AtomVersion::V10.text_value(&title).unwrap();

    assert_eq!(value.kind(), ContentKind::Html);
    assert_eq!(value.raw(), Some("<b>Bold</b>"));
    assert_eq!(value.to_text().as_deref(), Some("Bold"));
}

#[test]
fn given_atom10_without_type_when_text_value_then_plain_text() {
    let title = element(r#"<title xmlns="http://www.w3.org/2005/Atom"> a &lt; b </title>"#);

    let value = AtomVersion::V10.text_value(&title).unwrap();

    assert_eq!(value.kind(), ContentKind::Text);
    assert_eq!(value.raw(), Some("a < b"));
}

#[test]
fn given_atom10_xhtml_content_when_text_value_then_inner_xml_of_div() {
    let content = element(
        r#"<content xmlns="http://www.w3.org/2005/Atom" type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>One</p></div></content>"#,
    );

    let value = AtomVersion::V10.text_value(&content).unwrap();

    assert_eq!(value.kind(), ContentKind::Xhtml);
    assert_eq!(value.raw(), Some("<p>One</p>"));
}

/// **VALUE**: 0.3 escaped mode keeps the HTML as markup, not as entities.
#[test]
fn given_atom03_escaped_html_when_text_value_then_html_kind() {
    let content = element(
        r#"<content xmlns="http://purl.org/atom/ns#" type="text/html" mode="escaped">&lt;p&gt;Hi&lt;/p&gt;</content>"#,
    );

    let value = AtomVersion::V03.text_value(&content).unwrap();

    assert_eq!(value.kind(), ContentKind::Html);
    assert_eq!(value.raw(), Some("<p>Hi</p>"));
}

#[test]
fn given_atom03_base64_html_when_text_value_then_decoded() {
    let content = element(
        r#"<content xmlns="http://purl.org/atom/ns#" type="text/html" mode="base64">SGVsbG8gPGI+YmFzZTY0PC9iPg==</content>"#,
    );

    let value = AtomVersion::V03.text_value(&content).unwrap();

    assert_eq!(value.raw(), Some("Hello <b>base64</b>"));
}

#[test]
fn given_atom03_xml_mode_with_markup_and_no_type_when_text_value_then_xhtml_div() {
    let content = element(
        r#"<content xmlns="http://purl.org/atom/ns#"><div xmlns="http://www.w3.org/1999/xhtml">x<br/>y</div></content>"#,
    );

    let value = AtomVersion::V03.text_value(&content).unwrap();

    assert_eq!(value.kind(), ContentKind::Xhtml);
    assert_eq!(value.raw(), Some("x<br/>y"));
}

/// **BUG THIS CATCHES**: Markup without a wrapping `div` decoding to an
/// empty body.
#[test]
fn given_atom03_xml_mode_with_bare_markup_when_text_value_then_markup_kept() {
    let content = element(
        r#"<content xmlns="http://purl.org/atom/ns#"><p xmlns="http://www.w3.org/1999/xhtml">hi</p></content>"#,
    );

    let value = AtomVersion::V03.text_value(&content).unwrap();

    assert_eq!(value.kind(), ContentKind::Xhtml);
    assert_eq!(
        value.raw(),
        Some(r#"<p xmlns="http://www.w3.org/1999/xhtml">hi</p>"#)
    );
}

#[test]
fn given_atom03_invalid_base64_when_text_value_then_structure_error() {
    let content =
        element(r#"<content xmlns="http://purl.org/atom/ns#" mode="base64">!!!not base64</content>"#);

    assert!(AtomVersion::V03.text_value(&content).is_err());
}

/// **VALUE**: Only categories of the configured scheme belong to the blog.
///
/// **BUG THIS CATCHES**: Mixing in foreign schemes (e.g. Blogger's `kind`
/// marker) would surface internal markers as user categories.
#[test]
fn given_mixed_schemes_when_extract_categories_then_filtered_with_term_label_fallback() {
    // GIVEN
    let entry = element(&format!(
        r#"<entry xmlns="http://www.w3.org/2005/Atom">
             <category scheme="{SCHEME}" term="rust" label="Rust"/>
             <category scheme="{SCHEME}" term="" label="Only Label"/>
             <category scheme="{SCHEME}" term="only-term"/>
             <category scheme="{SCHEME}"/>
             <category scheme="http://other" term="nope"/>
           </entry>"#
    ));

    // WHEN
    let categories = AtomVersion::V10.extract_categories(&entry, Some(SCHEME));

    // THEN
    assert_eq!(
        categories,
        vec![
            Category::new("rust", "Rust"),
            Category::new("Only Label", "Only Label"),
            Category::new("only-term", "only-term"),
        ]
    );
}

#[test]
fn given_no_scheme_when_extract_categories_on_atom10_then_empty() {
    let entry = element(r#"<entry xmlns="http://www.w3.org/2005/Atom"><category term="a"/></entry>"#);

    assert!(AtomVersion::V10.extract_categories(&entry, None).is_empty());
}

#[test]
fn given_atom03_entry_when_extract_categories_then_reads_dc_subject() {
    let entry = element(
        r#"<entry xmlns="http://purl.org/atom/ns#" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:subject>travel</dc:subject><dc:subject></dc:subject></entry>"#,
    );

    assert_eq!(
        AtomVersion::V03.extract_categories(&entry, None),
        vec![Category::new("travel", "travel")]
    );
}

#[test]
fn given_blogger_dialect_when_category_element_then_label_is_omitted() {
    let category = AtomVersion::V10DraftBlogger.category_element("news", Some(SCHEME), "News");

    assert_eq!(category.attr("term"), Some("news"));
    assert_eq!(category.attr("scheme"), Some(SCHEME));
    assert_eq!(category.attr("label"), None);
    assert_eq!(
        AtomVersion::V10.category_element("news", Some(SCHEME), "News").attr("label"),
        Some("News")
    );
}

#[test]
fn given_atom03_when_category_element_then_dc_subject() {
    let category = AtomVersion::V03.category_element("news", Some(SCHEME), "News");

    assert!(category.is(ns::DC, "subject"));
    assert_eq!(category.text(), "news");
}

#[test]
fn given_categories_of_two_schemes_when_remove_categories_then_other_scheme_survives() {
    let mut entry = Element::in_ns(ns::ATOM_10, "entry")
        .with_child(AtomVersion::V10.category_element("a", Some(SCHEME), "A"))
        .with_child(AtomVersion::V10.category_element("b", Some("http://other"), "B"));

    AtomVersion::V10.remove_categories(&mut entry, Some(SCHEME));

    let left: Vec<_> = entry.elements().filter_map(|e| e.attr("term")).collect();
    assert_eq!(left, vec!["b"]);
}

#[test]
fn given_versions_when_asked_for_element_names_then_dialects_differ() {
    assert_eq!(AtomVersion::V03.updated_element(), "modified");
    assert_eq!(AtomVersion::V03.published_element(), "issued");
    assert_eq!(AtomVersion::V10.updated_element(), "updated");
    assert_eq!(AtomVersion::V10Draft.control_namespace(), ns::APP_DRAFT);
    assert_eq!(AtomVersion::V03.control_namespace(), ns::APP_03);
    assert_eq!(AtomVersion::V10.service_namespace(), ns::APP_10);
}
