// Unit tests for ContentValue conversions and the markup stripper

use crate::content::{ContentKind, ContentValue, escape_html, markup_to_text};
use crate::error::ContentError;

/// **VALUE**: Plain text asked for as HTML must come out escaped.
///
/// **BUG THIS CATCHES**: Unescaped `<` or `&` in titles would be rendered as
/// markup by the blog service.
#[test]
fn given_text_value_when_to_html_then_special_characters_are_escaped() {
    // GIVEN
    let value = ContentValue::text(r#"a < b & "c" 'd'"#);

    // WHEN
    let html = value.to_html().expect("raw is present");

    // THEN
    assert!(html.starts_with("a &lt; b &amp; &quot;c&quot; "));
    assert!(!html.contains('\''), "apostrophe must be escaped: {html}");
    assert_eq!(html, escape_html(r#"a < b & "c" 'd'"#));
}

#[test]
fn given_html_value_when_to_html_then_raw_is_returned_unchanged() {
    let value = ContentValue::html("<p>Tom &amp; Jerry</p>");

    assert_eq!(value.to_html().as_deref(), Some("<p>Tom &amp; Jerry</p>"));
}

/// **VALUE**: An absent payload is not an error for any target.
#[test]
fn given_absent_raw_when_get_value_then_every_target_yields_none() {
    for kind in [ContentKind::Text, ContentKind::Html, ContentKind::Xhtml] {
        let value = ContentValue::absent(kind);
        for target in [ContentKind::Text, ContentKind::Html, ContentKind::Xhtml] {
            assert_eq!(value.get_value(target).expect("never fails"), None);
        }
    }
}

#[test]
fn given_xhtml_value_when_get_value_xhtml_then_identity() {
    let value = ContentValue::xhtml("<p>Hi</p>");

    assert_eq!(
        value.get_value(ContentKind::Xhtml).expect("identity"),
        Some("<p>Hi</p>".to_string())
    );
}

/// **VALUE**: Text and HTML cannot be promoted to well-formed XHTML.
///
/// **BUG THIS CATCHES**: Silently passing HTML through as XHTML would produce
/// invalid Atom documents.
#[test]
fn given_text_or_html_when_get_value_xhtml_then_conversion_error_names_pair() {
    for value in [ContentValue::text("x"), ContentValue::html("<br>")] {
        // WHEN
        let result = value.get_value(ContentKind::Xhtml);

        // THEN
        match result {
            Err(ContentError::Conversion { from, to, .. }) => {
                assert_eq!(from, value.kind());
                assert_eq!(to, ContentKind::Xhtml);
            }
            other => panic!("expected Conversion error, got {other:?}"),
        }
    }
}

#[test]
fn given_html_when_to_text_then_tags_dropped_and_entities_decoded() {
    let value = ContentValue::html("<p>Hello <b>world</b></p><p>Again &amp; again</p>");

    assert_eq!(value.to_text().as_deref(), Some("Hello world Again & again"));
}

/// **VALUE**: Script and style bodies are not prose.
#[test]
fn given_script_and_style_when_markup_to_text_then_their_bodies_are_removed() {
    let html = "<style>p { color: red }</style><p>Hi</p><script>alert('x')</script><!-- note -->";

    assert_eq!(markup_to_text(html), "Hi");
}

#[test]
fn given_xhtml_with_line_breaks_when_to_text_then_block_boundaries_become_single_spaces() {
    let value = ContentValue::xhtml("<div>\n  <p>one</p>\n\n  <p>two<br/>three</p>\n</div>");

    assert_eq!(value.to_text().as_deref(), Some("one two three"));
}
