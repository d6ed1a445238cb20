use blogwire_probe::report::probe_account;

use blogwire_core::auth::{Credentials, StaticCredentialStore};
use blogwire_core::config::AccountConfig;
use blogwire_core::executor::TransportSettings;
use blogwire_core::protocol::ProtocolKind;

use std::sync::Arc;

use wiremock::matchers::{header, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn json_account(endpoint: String) -> AccountConfig {
    AccountConfig {
        name: "notes".to_string(),
        protocol: ProtocolKind::JsonRest,
        endpoint,
        identity_env: "UNUSED_USER".to_string(),
        secret_env: "UNUSED_SECRET".to_string(),
        category_scheme: None,
        api_key_env: None,
    }
}

fn store() -> Arc<StaticCredentialStore> {
    Arc::new(StaticCredentialStore::new(Credentials::new("alice", "token")))
}

/// **VALUE**: A healthy account reports valid credentials and its blogs.
#[tokio::test]
async fn given_reachable_account_when_probed_then_report_lists_blogs() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self"))
        .and(header("authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;
    Mock::given(path("/v3/users/self/blogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"items":[{"id":"1","name":"Notes","url":"https://notes.example.com/"}]}"#),
        )
        .mount(&server)
        .await;
    let account = json_account(format!("{}/v3/", server.uri()));

    // WHEN
    let report = probe_account(&account, &TransportSettings::default(), store()).await;

    // THEN
    assert!(report.is_ok(), "{report:?}");
    assert_eq!(report.credentials_valid, Some(true));
    assert_eq!(report.blogs.len(), 1);
    assert_eq!(report.blogs[0].name, "Notes");
    assert!(report.capabilities.is_some_and(|c| c.supports_post_as_draft));
}

/// **VALUE**: Rejected credentials stop the probe before listing blogs and
/// are not reported as an error.
#[tokio::test]
async fn given_rejected_credentials_when_probed_then_no_blogs_requested() {
    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(path("/v3/users/self/blogs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let account = json_account(format!("{}/v3/", server.uri()));

    let report = probe_account(&account, &TransportSettings::default(), store()).await;

    assert_eq!(report.credentials_valid, Some(false));
    assert!(report.error.is_none());
    assert!(!report.is_ok());
}

/// **BUG THIS CATCHES**: One broken account aborting the whole probe run.
#[tokio::test]
async fn given_server_error_when_probed_then_error_recorded_in_report() {
    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    let account = json_account(format!("{}/v3/", server.uri()));

    let report = probe_account(&account, &TransportSettings::default(), store()).await;

    let error = report.error.expect("error recorded");
    assert!(error.contains("503"), "{error}");
    assert_eq!(report.credentials_valid, None);
}

#[test]
fn given_report_when_serialized_then_protocol_is_kebab_case() {
    let report = blogwire_probe::report::AccountReport {
        account: "a".to_string(),
        protocol: ProtocolKind::BloggerAtom,
        capabilities: None,
        credentials_valid: Some(true),
        blogs: Vec::new(),
        error: None,
    };

    let json = serde_json::to_string(&report).unwrap();

    assert!(json.contains(r#""protocol":"blogger-atom""#), "{json}");
}
