use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Comments, script/style bodies, and tags. Group 1 is the tag name.
const MARKUP_PATTERN: &str = r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>|</?\s*([a-z][a-z0-9:_-]*)[^>]*>";
const WHITESPACE_PATTERN: &str = r"\s+";

static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn markup_regex() -> &'static Regex {
    MARKUP_REGEX.get_or_init(|| Regex::new(MARKUP_PATTERN).expect("valid regex pattern"))
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| Regex::new(WHITESPACE_PATTERN).expect("valid regex pattern"))
}

/// Tags that separate words when removed.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Entity-escape text for inclusion in HTML (`& < > " '`).
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Strip HTML/XHTML markup down to plain text.
///
/// Tags and comments are dropped, block-level boundaries become a space,
/// whitespace runs collapse to one space, and entities are decoded last so
/// escaped angle brackets survive as literal text.
pub fn markup_to_text(markup: &str) -> String {
    let stripped = markup_regex().replace_all(markup, |caps: &Captures<'_>| {
        let is_block = caps.get(1).is_some_and(|name| {
            let name = name.as_str().to_ascii_lowercase();
            let local = name.rsplit(':').next().unwrap_or(&name);
            BLOCK_TAGS.contains(&local)
        });
        if is_block { " " } else { "" }
    });
    let collapsed = whitespace_regex().replace_all(&stripped, " ");
    html_escape::decode_html_entities(collapsed.trim()).into_owned()
}
