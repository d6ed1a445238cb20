use crate::helpers::{credentials, executor};

use blogwire_core::auth::AnonymousSigner;
use blogwire_core::error::ExecutorError;
use blogwire_core::executor::SignedRequest;

use std::sync::Arc;

use reqwest::Method;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn anonymous_get() -> SignedRequest {
    SignedRequest::new(Method::GET, Arc::new(AnonymousSigner), credentials())
}

/// **VALUE**: A query the redirect target omits is carried over from the
/// URI that was redirected.
///
/// **BUG THIS CATCHES**: API keys vanishing after a server-side move.
#[tokio::test]
async fn given_redirect_without_query_when_executed_then_original_query_is_kept() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/b"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .and(query_param("key", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .expect(1)
        .mount(&server)
        .await;

    let request = anonymous_get();
    let uri = Url::parse(&format!("{}/a?key=abc", server.uri())).unwrap();

    // WHEN
    let response = executor().execute(&uri, |hop| request.build(hop)).await.unwrap();

    // THEN
    assert!(response.status().is_success());
    assert_eq!(response.text(), "moved");
    assert_eq!(response.url().path(), "/b");
    assert_eq!(response.url().query(), Some("key=abc"));
}

/// **VALUE**: A redirect that brings its own query replaces the original
/// one, and the terminal body comes back untouched.
///
/// **BUG THIS CATCHES**: Appending a stale `auth=` token to a location that
/// already names what it wants.
#[tokio::test]
async fn given_feed_redirect_with_new_query_when_executed_then_entry_returned_unchanged() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(query_param("auth", "t1"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/feed?id=9"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(query_param("id", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<entry/>"))
        .expect(1)
        .mount(&server)
        .await;

    let request = anonymous_get();
    let uri = Url::parse(&format!("{}/feed?auth=t1", server.uri())).unwrap();

    // WHEN
    let response = executor().execute(&uri, |hop| request.build(hop)).await.unwrap();

    // THEN
    assert_eq!(response.body(), b"<entry/>");
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[1].url.query(), Some("id=9"));
}

#[tokio::test]
async fn given_redirect_with_own_query_when_executed_then_target_query_wins() {
    let server = MockServer::start().await;
    Mock::given(path("/a"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/b?page=2"))
        .mount(&server)
        .await;
    Mock::given(path("/b"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let request = anonymous_get();
    let uri = Url::parse(&format!("{}/a?key=abc", server.uri())).unwrap();

    let response = executor().execute(&uri, |hop| request.build(hop)).await.unwrap();

    assert_eq!(response.url().query(), Some("page=2"));
}

/// **VALUE**: Error statuses are data, not executor failures.
#[tokio::test]
async fn given_server_error_when_executed_then_response_is_returned() {
    let server = MockServer::start().await;
    Mock::given(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let request = anonymous_get();
    let uri = Url::parse(&format!("{}/broken", server.uri())).unwrap();

    let response = executor().execute(&uri, |hop| request.build(hop)).await.unwrap();

    assert_eq!(response.status().0, 500);
    assert_eq!(response.text(), "boom");
}

/// **VALUE**: A redirect loop ends with a limit error instead of spinning.
///
/// **WHY THIS MATTERS**: Misconfigured blogs redirect to themselves.
#[tokio::test]
async fn given_redirect_loop_when_executed_then_limit_error_names_original_uri() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .expect(51)
        .mount(&server)
        .await;

    let request = anonymous_get();
    let uri = Url::parse(&format!("{}/loop", server.uri())).unwrap();

    // WHEN
    let result = executor().execute(&uri, |hop| request.build(hop)).await;

    // THEN
    match result {
        Err(ExecutorError::RedirectLimitExceeded { uri: reported, limit, .. }) => {
            assert_eq!(reported, uri.to_string());
            assert_eq!(limit, 50);
        }
        other => panic!("expected RedirectLimitExceeded, got {other:?}"),
    }
}

#[tokio::test]
async fn given_redirect_without_location_when_executed_then_invalid_redirect() {
    let server = MockServer::start().await;
    Mock::given(path("/nowhere"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let request = anonymous_get();
    let uri = Url::parse(&format!("{}/nowhere", server.uri())).unwrap();

    let result = executor().execute(&uri, |hop| request.build(hop)).await;

    match result {
        Err(ExecutorError::InvalidRedirect { status, .. }) => assert_eq!(status.0, 302),
        other => panic!("expected InvalidRedirect, got {other:?}"),
    }
}

#[tokio::test]
async fn given_unreachable_host_when_executed_then_transport_error_is_connection() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let request = anonymous_get();
    let uri = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();

    let result = executor().execute(&uri, |hop| request.build(hop)).await;

    match result {
        Err(error @ ExecutorError::Transport { .. }) => assert!(error.is_retryable()),
        other => panic!("expected Transport error, got {other:?}"),
    }
}
