use crate::helpers::credential_store;

use blogwire_core::config::AccountConfig;
use blogwire_core::error::{AuthError, ProtocolError};
use blogwire_core::executor::TransportSettings;
use blogwire_core::protocol::{ProtocolKind, build_client};

use serial_test::serial;
use wiremock::matchers::{path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn account(protocol: ProtocolKind) -> AccountConfig {
    AccountConfig {
        name: "test".to_string(),
        protocol,
        endpoint: "https://blog.example.com/app/service".to_string(),
        identity_env: "BLOGWIRE_FACTORY_USER".to_string(),
        secret_env: "BLOGWIRE_FACTORY_SECRET".to_string(),
        category_scheme: None,
        api_key_env: None,
    }
}

#[test]
fn given_each_protocol_when_building_then_client_reports_its_name() {
    let settings = TransportSettings::default();
    let cases = [
        (ProtocolKind::Atom, "atom"),
        (ProtocolKind::BloggerAtom, "blogger-atom"),
        (ProtocolKind::WsseAtom, "wsse-atom"),
        (ProtocolKind::JsonRest, "json-rest"),
    ];

    for (kind, name) in cases {
        let client = build_client(&account(kind), &settings, credential_store()).unwrap();
        assert_eq!(client.protocol_name(), name);
        assert_eq!(kind.to_string(), name);
    }
}

#[test]
fn given_wsse_client_when_built_then_drafts_unsupported() {
    let client = build_client(
        &account(ProtocolKind::WsseAtom),
        &TransportSettings::default(),
        credential_store(),
    )
    .unwrap();

    assert!(!client.capabilities().supports_post_as_draft);
    assert!(client.capabilities().supports_categories);
}

/// **BUG THIS CATCHES**: Silently sending requests without the configured key.
#[test]
#[serial]
fn given_unset_api_key_env_when_building_json_client_then_auth_error() {
    unsafe {
        std::env::remove_var("BLOGWIRE_FACTORY_KEY");
    }
    let mut account = account(ProtocolKind::JsonRest);
    account.api_key_env = Some("BLOGWIRE_FACTORY_KEY".to_string());

    let result = build_client(&account, &TransportSettings::default(), credential_store());

    assert!(matches!(
        result,
        Err(ProtocolError::Auth(AuthError::CredentialsUnavailable { .. }))
    ));
}

/// **VALUE**: An API key kept only in a `.env` file is found, the same way
/// account credentials are.
///
/// **BUG THIS CATCHES**: JSON accounts failing with "not set" although the
/// key sits in `.env` next to the user's other secrets.
#[tokio::test]
#[serial]
async fn given_api_key_only_in_dotenv_when_building_json_client_then_key_sent() {
    // GIVEN
    unsafe {
        std::env::remove_var("BLOGWIRE_DOTENV_KEY");
    }
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "BLOGWIRE_DOTENV_KEY=from-dotenv\n").unwrap();
    let previous_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let server = MockServer::start().await;
    Mock::given(path("/v3/users/self"))
        .and(query_param("key", "from-dotenv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;
    let mut account = account(ProtocolKind::JsonRest);
    account.endpoint = format!("{}/v3/", server.uri());
    account.api_key_env = Some("BLOGWIRE_DOTENV_KEY".to_string());

    // WHEN
    let built = build_client(&account, &TransportSettings::default(), credential_store());
    std::env::set_current_dir(previous_dir).unwrap();
    unsafe {
        std::env::remove_var("BLOGWIRE_DOTENV_KEY");
    }

    // THEN
    let client = built.unwrap();
    assert!(client.verify_credentials().await.unwrap());
}
