use crate::helpers::{credential_store, executor};

use blogwire_core::content::ContentValue;
use blogwire_core::error::ProtocolError;
use blogwire_core::protocol::json::JsonRestClient;
use blogwire_core::protocol::{BlogPost, Category, ProtocolClient};

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, api_key: Option<&str>) -> JsonRestClient {
    JsonRestClient::new(
        Url::parse(&format!("{}/v3", server.uri())).unwrap(),
        api_key.map(str::to_string),
        executor(),
        credential_store(),
    )
}

#[tokio::test]
async fn given_valid_token_when_verifying_then_true() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/users/self"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u1" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, None).verify_credentials().await.unwrap());
}

#[tokio::test]
async fn given_403_when_verifying_then_false() {
    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(!client(&server, None).verify_credentials().await.unwrap());
}

/// **VALUE**: The API key survives a redirect whose target drops the query.
///
/// **BUG THIS CATCHES**: A moved endpoint answering 403 because the key
/// only rode on the first hop.
#[tokio::test]
async fn given_api_key_and_redirect_when_getting_blogs_then_key_carried_to_target() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self/blogs"))
        .and(query_param("key", "k1"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/v3/moved/blogs"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/v3/moved/blogs"))
        .and(query_param("key", "k1"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "42", "name": "Notes", "url": "https://notes.example.com/" },
                { "id": "43" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let blogs = client(&server, Some("k1")).get_blogs().await.unwrap();

    // THEN
    assert_eq!(blogs.len(), 2);
    assert_eq!(blogs[0].id, "42");
    assert_eq!(blogs[0].name, "Notes");
    assert_eq!(blogs[0].homepage_url, "https://notes.example.com/");
    assert_eq!(blogs[1].name, "");
}

#[tokio::test]
async fn given_no_items_field_when_getting_blogs_then_empty() {
    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self/blogs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "kind": "blogger#blogList" })),
        )
        .mount(&server)
        .await;

    assert!(client(&server, None).get_blogs().await.unwrap().is_empty());
}

#[tokio::test]
async fn given_malformed_json_when_getting_blogs_then_remote_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let error = client(&server, None).get_blogs().await.unwrap_err();

    match error {
        ProtocolError::RemoteProtocol { message, .. } => {
            assert!(message.contains("malformed JSON"))
        }
        other => panic!("expected RemoteProtocol, got {other:?}"),
    }
}

#[tokio::test]
async fn given_json_client_when_getting_categories_then_unsupported() {
    let server = MockServer::start().await;

    let error = client(&server, None).get_categories("42").await.unwrap_err();

    assert!(matches!(error, ProtocolError::UnsupportedOperation { .. }));
}

/// **VALUE**: Drafts are created with `isDraft=true`; labels ride in the body.
#[tokio::test]
async fn given_draft_when_created_then_is_draft_query_and_labels_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/blogs/42/posts"))
        .and(query_param("isDraft", "true"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "title": "Draft",
            "content": "plain &lt;text&gt;",
            "labels": ["Rust"]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"e1\"")
                .set_body_json(json!({
                    "id": "p1",
                    "title": "Draft",
                    "content": "plain &lt;text&gt;",
                    "labels": ["Rust"],
                    "status": "DRAFT"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let mut post = BlogPost::new("Draft", ContentValue::text("plain <text>"));
    post.categories = vec![Category::new("rust", "Rust")];
    post.publish = false;

    // WHEN
    let result = client(&server, None)
        .create_or_update_post("42", &post, true)
        .await
        .unwrap();

    // THEN
    assert_eq!(result.post_id, "p1");
    assert_eq!(result.etag.as_deref(), Some("\"e1\""));
    let remote = result.remote_post.unwrap();
    assert!(!remote.publish);
    assert_eq!(remote.categories, vec![Category::new("Rust", "Rust")]);
}

#[tokio::test]
async fn given_existing_post_when_updated_then_put_with_if_match() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v3/blogs/42/posts/p1"))
        .and(header("if-match", "\"e1\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "p1", "etag": "\"e2\"" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let mut post = BlogPost::new("Again", ContentValue::html("<p>x</p>"));
    post.id = Some("p1".to_string());
    post.etag = Some("\"e1\"".to_string());

    let result = client(&server, None)
        .create_or_update_post("42", &post, false)
        .await
        .unwrap();

    assert_eq!(result.post_id, "p1");
    assert_eq!(result.etag.as_deref(), Some("\"e2\""));
}

#[tokio::test]
async fn given_posts_when_getting_recent_posts_then_max_results_sent_and_list_capped() {
    let server = MockServer::start().await;
    let items: Vec<Value> = (1..=3)
        .map(|i| {
            json!({
                "id": format!("p{i}"),
                "title": format!("Post {i}"),
                "published": "2024-01-02T03:04:05Z"
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/v3/blogs/42/posts"))
        .and(query_param("maxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(&server)
        .await;

    let posts = client(&server, None).get_recent_posts("42", 2).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "Post 1");
    assert!(posts[0].date_published.is_some());
}

#[tokio::test]
async fn given_missing_post_when_deleting_then_ok() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v3/blogs/42/posts/p9"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, None).delete_post("42", "p9").await.is_ok());
}

#[tokio::test]
async fn given_post_with_etag_header_when_getting_post_then_header_etag_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/blogs/42/posts/p1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"fresh\"")
                .set_body_json(json!({
                    "id": "p1",
                    "title": "One",
                    "content": "<p>one</p>",
                    "url": "https://notes.example.com/one",
                    "etag": "\"stale\"",
                    "status": "LIVE"
                })),
        )
        .mount(&server)
        .await;

    let post = client(&server, None).get_post("42", "p1").await.unwrap();

    assert_eq!(post.etag.as_deref(), Some("\"fresh\""));
    assert_eq!(post.contents.to_text().as_deref(), Some("one"));
    assert_eq!(post.permalink.as_deref(), Some("https://notes.example.com/one"));
    assert!(post.publish);
}

/// **VALUE**: A post id is encoded as a single path segment, so it always
/// addresses a post under `/blogs/{id}/posts/`.
///
/// **BUG THIS CATCHES**: An id like `../../users/self` resolving to another
/// resource and turning a delete into a request against the account.
#[tokio::test]
async fn given_post_id_with_dot_segments_when_deleting_then_request_stays_under_posts() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v3/blogs/42/posts/..%2F..%2Fusers%2Fself"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/v3/users/self"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    // WHEN
    let result = client(&server, None).delete_post("42", "../../users/self").await;

    // THEN
    assert!(result.is_ok());
}

/// **VALUE**: Ids that are themselves dot segments are rejected before any
/// request is made.
///
/// **BUG THIS CATCHES**: `..` as a post id silently addressing the blog.
#[tokio::test]
async fn given_dot_dot_post_id_when_getting_post_then_invalid_request_and_nothing_sent() {
    let server = MockServer::start().await;

    let error = client(&server, None).get_post("42", "..").await.unwrap_err();

    assert!(matches!(error, ProtocolError::InvalidRequest { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
