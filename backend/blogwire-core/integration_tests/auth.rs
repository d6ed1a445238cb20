use crate::helpers::{credential_store, credentials, executor};

use blogwire_core::auth::{CredentialStore, EnvCredentialStore, WsseSigner};
use blogwire_core::error::AuthError;
use blogwire_core::executor::SignedRequest;

use std::sync::Arc;

use reqwest::Method;
use serial_test::serial;
use url::Url;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Every hop of a redirect chain carries its own WSSE token.
///
/// **WHY THIS MATTERS**: WSSE servers reject a nonce they have already seen,
/// so a token reused on the second hop fails authentication.
///
/// **BUG THIS CATCHES**: Signing once outside the request factory.
#[tokio::test]
async fn given_redirect_when_wsse_request_executes_then_each_hop_has_fresh_nonce() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .and(header_exists("x-wsse"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .and(header_exists("x-wsse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let request = SignedRequest::new(Method::GET, Arc::new(WsseSigner::new()), credentials());
    let uri = Url::parse(&format!("{}/old", server.uri())).unwrap();

    // WHEN
    let response = executor()
        .execute(&uri, |hop| request.build(hop))
        .await
        .expect("chain completes");

    // THEN
    assert_eq!(response.text(), "ok");
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    let tokens: Vec<_> = received
        .iter()
        .map(|r| r.headers.get("x-wsse").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_ne!(tokens[0], tokens[1]);
    assert!(tokens[0].starts_with("UsernameToken Username=\"alice\", PasswordDigest=\""));
    assert_eq!(
        received[0].headers.get("authorization").unwrap().to_str().unwrap(),
        "WSSE profile=\"UsernameToken\""
    );
}

#[test]
fn given_static_store_when_credentials_then_returns_configured_pair() {
    let store = credential_store();

    let credentials = store.credentials().expect("static");

    assert_eq!(credentials.identity(), "alice");
    assert_eq!(credentials.secret(), "s3cret");
}

/// **VALUE**: Credentials come from the environment variables an account names.
#[test]
#[serial]
fn given_env_vars_set_when_env_store_reads_then_credentials_resolve() {
    // GIVEN
    unsafe {
        std::env::set_var("BLOGWIRE_TEST_USER", "bob");
        std::env::set_var("BLOGWIRE_TEST_SECRET", "hunter2");
    }
    let store = EnvCredentialStore::new("BLOGWIRE_TEST_USER", "BLOGWIRE_TEST_SECRET");

    // WHEN
    let credentials = store.credentials().expect("vars are set");

    // THEN
    assert_eq!(credentials.identity(), "bob");
    assert_eq!(credentials.secret(), "hunter2");

    unsafe {
        std::env::remove_var("BLOGWIRE_TEST_USER");
        std::env::remove_var("BLOGWIRE_TEST_SECRET");
    }
}

#[test]
#[serial]
fn given_missing_env_var_when_env_store_reads_then_credentials_unavailable() {
    unsafe {
        std::env::remove_var("BLOGWIRE_TEST_MISSING_USER");
    }
    let store = EnvCredentialStore::new("BLOGWIRE_TEST_MISSING_USER", "BLOGWIRE_TEST_SECRET");

    let result = store.credentials();

    match result {
        Err(AuthError::CredentialsUnavailable { message, .. }) => {
            assert!(message.contains("BLOGWIRE_TEST_MISSING_USER"));
        }
        other => panic!("expected CredentialsUnavailable, got {other:?}"),
    }
}
