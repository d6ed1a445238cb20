use crate::helpers::{
    TAG_SCHEME, credential_store, entry_document, executor, feed_document, service_document,
};

use blogwire_core::content::ContentValue;
use blogwire_core::error::ProtocolError;
use blogwire_core::protocol::atom::{AtomClient, GenericAtomProfile};
use blogwire_core::protocol::{BlogInfo, BlogPost, Category, ProtocolClient};

use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AtomClient {
    AtomClient::new(
        Box::new(GenericAtomProfile::new(Some(TAG_SCHEME.to_string()))),
        Url::parse(&format!("{}/service", server.uri())).unwrap(),
        executor(),
        credential_store(),
    )
}

async fn mount_service(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/service"))
        .respond_with(ResponseTemplate::new(200).set_body_string(service_document()))
        .mount(server)
        .await;
}

fn hello_post() -> BlogPost {
    let mut post = BlogPost::new("Hello", ContentValue::html("<p>Hi there</p>"));
    post.categories = vec![Category::new("rust", "Rust")];
    post
}

// ============================================
// VERIFY CREDENTIALS
// ============================================

#[tokio::test]
async fn given_service_document_when_verifying_then_true_and_basic_auth_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/service"))
        .and(header("authorization", "Basic YWxpY2U6czNjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(service_document()))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).verify_credentials().await.unwrap());
}

/// **VALUE**: Rejected credentials are an answer, not an error.
#[tokio::test]
async fn given_401_when_verifying_then_false() {
    let server = MockServer::start().await;
    Mock::given(path("/service"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(!client(&server).verify_credentials().await.unwrap());
}

#[tokio::test]
async fn given_500_when_verifying_then_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(path("/service"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let error = client(&server).verify_credentials().await.unwrap_err();

    assert_eq!(error.status_code(), Some(500));
}

#[tokio::test]
async fn given_non_xml_body_when_verifying_then_remote_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(path("/service"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not xml"))
        .mount(&server)
        .await;

    let error = client(&server).verify_credentials().await.unwrap_err();

    assert!(matches!(error, ProtocolError::RemoteProtocol { .. }), "{error:?}");
}

// ============================================
// BLOGS AND CATEGORIES
// ============================================

/// **VALUE**: Only collections accepting entries are blogs, named after
/// their workspace and collection, with the homepage from their feed.
#[tokio::test]
async fn given_service_document_when_getting_blogs_then_entry_collections_listed() {
    // GIVEN
    let server = MockServer::start().await;
    mount_service(&server).await;
    Mock::given(method("GET"))
        .and(path("/collections/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(feed_document("Posts", "https://blog.example.com/")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/collections/media"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // WHEN
    let blogs = client(&server).get_blogs().await.unwrap();

    // THEN
    assert_eq!(
        blogs,
        vec![BlogInfo {
            id: format!("{}/collections/posts", server.uri()),
            name: "My Site - Posts".to_string(),
            homepage_url: "https://blog.example.com/".to_string(),
        }]
    );
}

#[tokio::test]
async fn given_feed_at_service_url_when_getting_blogs_then_feed_is_the_only_blog() {
    let server = MockServer::start().await;
    Mock::given(path("/service"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(feed_document("Just A Feed", "https://feed.example.com/")),
        )
        .mount(&server)
        .await;

    let blogs = client(&server).get_blogs().await.unwrap();

    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].id, format!("{}/service", server.uri()));
    assert_eq!(blogs[0].name, "Just A Feed");
    assert_eq!(blogs[0].homepage_url, "https://feed.example.com/");
}

/// **VALUE**: Inline and out-of-line category blocks are merged in document
/// order, filtered to the account's scheme.
///
/// **BUG THIS CATCHES**: Fetching the same categories document twice, or
/// following a cycle forever.
#[tokio::test]
async fn given_inline_and_linked_categories_when_getting_categories_then_scheme_matches_merged() {
    // GIVEN
    let server = MockServer::start().await;
    mount_service(&server).await;
    let linked = format!(
        r#"<app:categories xmlns:app="http://www.w3.org/2007/app" xmlns:atom="http://www.w3.org/2005/Atom" scheme="{TAG_SCHEME}">
  <atom:category term="travel"/>
  <atom:category term="" label=""/>
</app:categories>"#
    );
    Mock::given(method("GET"))
        .and(path("/cats"))
        .respond_with(ResponseTemplate::new(200).set_body_string(linked))
        .expect(1)
        .mount(&server)
        .await;
    let blog_id = format!("{}/collections/posts", server.uri());

    // WHEN
    let categories = client(&server).get_categories(&blog_id).await.unwrap();

    // THEN
    assert_eq!(
        categories,
        vec![Category::new("rust", "Rust"), Category::new("travel", "travel")]
    );
}

#[tokio::test]
async fn given_unknown_blog_when_getting_categories_then_remote_protocol_error() {
    let server = MockServer::start().await;
    mount_service(&server).await;

    let error = client(&server)
        .get_categories("https://elsewhere.example.com/posts")
        .await
        .unwrap_err();

    assert!(matches!(error, ProtocolError::RemoteProtocol { .. }));
}

// ============================================
// POSTS
// ============================================

#[tokio::test]
async fn given_new_post_when_created_then_entry_posted_and_edit_link_is_id() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/posts"))
        .and(header("content-type", "application/atom+xml;type=entry"))
        .and(header("slug", "hello-world"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("ETag", "\"v1\"")
                .set_body_string(entry_document("urn:uuid:1", "/entries/1", "Hello")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let mut post = hello_post();
    post.slug = Some("hello-world".to_string());
    let blog_id = format!("{}/collections/posts", server.uri());

    // WHEN
    let result = client(&server).create_or_update_post(&blog_id, &post, true).await.unwrap();

    // THEN
    assert_eq!(result.post_id, format!("{}/entries/1", server.uri()));
    assert_eq!(result.etag.as_deref(), Some("\"v1\""));
    let remote = result.remote_post.unwrap();
    assert_eq!(remote.title, "Hello");
    assert!(remote.publish);

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<id>urn:uuid:"));
    assert!(body.contains(r#"<content type="html">&lt;p&gt;Hi there&lt;/p&gt;</content>"#));
    assert!(body.contains(&format!(r#"scheme="{TAG_SCHEME}""#)));
}

#[tokio::test]
async fn given_created_without_body_when_location_returned_then_location_is_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/posts"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/entries/9"))
        .mount(&server)
        .await;
    let blog_id = format!("{}/collections/posts", server.uri());

    let result = client(&server)
        .create_or_update_post(&blog_id, &hello_post(), true)
        .await
        .unwrap();

    assert_eq!(result.post_id, format!("{}/entries/9", server.uri()));
    assert!(result.remote_post.is_none());
}

/// **VALUE**: Drafts carry `app:control/app:draft`.
#[tokio::test]
async fn given_draft_when_created_then_control_draft_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/entries/2"))
        .mount(&server)
        .await;
    let mut post = hello_post();
    post.publish = false;
    let blog_id = format!("{}/collections/posts", server.uri());

    client(&server).create_or_update_post(&blog_id, &post, true).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    assert!(body.contains("<app:control><app:draft>yes</app:draft></app:control>"), "{body}");
}

/// **VALUE**: Updates are conditional on the ETag the post was read with.
///
/// **BUG THIS CATCHES**: Overwriting an edit someone made in between.
#[tokio::test]
async fn given_existing_post_when_updated_then_put_with_if_match() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/entries/1"))
        .and(header("if-match", "\"v1\""))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"v2\""))
        .expect(1)
        .mount(&server)
        .await;
    let mut post = hello_post();
    post.id = Some(format!("{}/entries/1", server.uri()));
    post.etag = Some("\"v1\"".to_string());

    // WHEN
    let result = client(&server).create_or_update_post("ignored", &post, false).await.unwrap();

    // THEN
    assert_eq!(result.post_id, format!("{}/entries/1", server.uri()));
    assert_eq!(result.etag.as_deref(), Some("\"v2\""));
    assert!(result.remote_post.is_none());

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    assert!(!body.contains("<id>"));
}

#[tokio::test]
async fn given_update_without_id_when_saving_then_invalid_request() {
    let server = MockServer::start().await;

    let error = client(&server)
        .create_or_update_post("ignored", &hello_post(), false)
        .await
        .unwrap_err();

    assert!(matches!(error, ProtocolError::InvalidRequest { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn given_conflict_when_updating_then_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(412).set_body_string("precondition failed"))
        .mount(&server)
        .await;
    let mut post = hello_post();
    post.id = Some(format!("{}/entries/1", server.uri()));

    let error = client(&server).create_or_update_post("ignored", &post, false).await.unwrap_err();

    assert_eq!(error.status_code(), Some(412));
}

#[tokio::test]
async fn given_entry_with_weak_etag_when_getting_post_then_fields_parsed_and_etag_dropped() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entries/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "W/\"weak\"")
                .set_body_string(entry_document("urn:uuid:1", "/entries/1", "Hello")),
        )
        .mount(&server)
        .await;
    let post_id = format!("{}/entries/1", server.uri());

    // WHEN
    let post = client(&server).get_post("ignored", &post_id).await.unwrap();

    // THEN
    assert_eq!(post.id.as_deref(), Some(post_id.as_str()));
    assert_eq!(post.etag, None);
    assert_eq!(post.title, "Hello");
    assert_eq!(post.contents.to_html().as_deref(), Some("<p>Body of Hello</p>"));
    assert_eq!(post.categories, vec![Category::new("rust", "Rust")]);
    assert_eq!(
        post.permalink.as_deref(),
        Some("https://blog.example.com/urn:uuid:1")
    );
    assert_eq!(
        post.date_published.map(|d| d.to_rfc3339()),
        Some("2024-01-02T03:04:05+00:00".to_string())
    );
}

#[tokio::test]
async fn given_gone_post_when_deleting_then_ok_and_if_match_star_sent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/entries/1"))
        .and(header("if-match", "*"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .delete_post("ignored", &format!("{}/entries/1", server.uri()))
        .await;

    assert!(result.is_ok());
}

/// **VALUE**: Paging follows `next` links and stops at the first repeated
/// entry id.
///
/// **BUG THIS CATCHES**: Servers whose last page links back to itself.
#[tokio::test]
async fn given_paged_feed_when_getting_recent_posts_then_next_links_followed_until_duplicate() {
    // GIVEN
    let server = MockServer::start().await;
    let page = |entries: &[(&str, &str)], next: &str| {
        let body: String = entries
            .iter()
            .map(|(id, edit)| entry_document(id, edit, id))
            .collect();
        format!(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><link rel="next" href="{next}"/>{body}</feed>"#
        )
    };
    Mock::given(path("/collections/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(
            &[("e1", "/entries/1"), ("e2", "/entries/2")],
            "/collections/posts/page2",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/collections/posts/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(
            &[("e3", "/entries/3"), ("e1", "/entries/1")],
            "/collections/posts/page3",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/collections/posts/page3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let blog_id = format!("{}/collections/posts", server.uri());

    // WHEN
    let posts = client(&server).get_recent_posts(&blog_id, 10).await.unwrap();

    // THEN
    let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["e1", "e2", "e3"]);
    assert_eq!(posts[2].id, Some(format!("{}/entries/3", server.uri())));
}

/// **VALUE**: Entries with an empty `<id>` are told apart by their edit
/// link, so a feed that omits ids still lists every entry.
///
/// **BUG THIS CATCHES**: Every id-less entry after the first being taken for
/// a repeat of it, truncating the list to one post.
#[tokio::test]
async fn given_entries_without_ids_when_getting_recent_posts_then_all_entries_returned() {
    // GIVEN
    let server = MockServer::start().await;
    let feed = format!(
        r#"<feed xmlns="http://www.w3.org/2005/Atom">{}{}</feed>"#,
        entry_document("", "/entries/1", "first"),
        entry_document("", "/entries/2", "second"),
    );
    Mock::given(path("/collections/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .mount(&server)
        .await;
    let blog_id = format!("{}/collections/posts", server.uri());

    // WHEN
    let posts = client(&server).get_recent_posts(&blog_id, 10).await.unwrap();

    // THEN
    let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["first", "second"]);
}

#[tokio::test]
async fn given_max_reached_on_first_page_when_getting_recent_posts_then_next_not_fetched() {
    let server = MockServer::start().await;
    let feed = format!(
        r#"<feed xmlns="http://www.w3.org/2005/Atom"><link rel="next" href="/more"/>{}{}{}</feed>"#,
        entry_document("a", "/entries/a", "a"),
        entry_document("b", "/entries/b", "b"),
        entry_document("c", "/entries/c", "c"),
    );
    Mock::given(path("/collections/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .mount(&server)
        .await;
    Mock::given(path("/more"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let blog_id = format!("{}/collections/posts", server.uri());

    let posts = client(&server).get_recent_posts(&blog_id, 2).await.unwrap();

    assert_eq!(posts.len(), 2);
}
