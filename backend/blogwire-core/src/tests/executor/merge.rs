// Unit tests for redirect target resolution and query carry-over

use crate::executor::merge_redirect_uri;

use url::Url;

fn merge(current: &str, location: &str) -> String {
    merge_redirect_uri(&Url::parse(current).unwrap(), location)
        .unwrap()
        .to_string()
}

/// **VALUE**: Query parameters survive a redirect that drops them.
///
/// **WHY THIS MATTERS**: API keys and auth tokens often ride in the query; a
/// host that redirects to a bare URL would otherwise strip them.
#[test]
fn given_current_query_when_location_has_none_then_current_query_is_appended() {
    assert_eq!(merge("http://a/x?k=v", "http://b/y"), "http://b/y?k=v");
}

/// **BUG THIS CATCHES**: Appending blindly would produce `?j=w&k=v` and leak
/// the old parameters to a host that chose its own.
#[test]
fn given_location_with_own_query_when_merged_then_location_wins_verbatim() {
    assert_eq!(merge("http://a/x?k=v", "http://b/y?j=w"), "http://b/y?j=w");
}

#[test]
fn given_relative_location_with_query_when_merged_then_resolved_against_current_host() {
    assert_eq!(
        merge("https://host/feed?auth=t1", "/feed?id=9"),
        "https://host/feed?id=9"
    );
}

#[test]
fn given_relative_location_without_query_when_merged_then_current_query_is_kept() {
    assert_eq!(
        merge("https://host/a/feed?auth=t1", "../b/entries"),
        "https://host/b/entries?auth=t1"
    );
}

#[test]
fn given_current_without_query_when_merged_then_location_is_used_as_is() {
    assert_eq!(merge("https://host/feed", " https://cdn/feed "), "https://cdn/feed");
}
