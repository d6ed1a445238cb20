use blogwire_core::config::BlogwireConfig;
use blogwire_core::error::ConfigError;
use blogwire_core::protocol::ProtocolKind;

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

fn write_config(contents: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blogwire.toml"), contents).unwrap();
    dir
}

/// **VALUE**: A first run without a config file still works.
#[test]
fn given_no_config_file_when_loading_then_defaults_are_used() {
    let dir = TempDir::new().unwrap();

    let config = BlogwireConfig::load(dir.path()).unwrap();

    assert_eq!(config, BlogwireConfig::default());
    assert!(config.accounts.is_empty());
    assert_eq!(config.transport.timeout_secs, 30);
}

#[test]
fn given_valid_toml_when_loading_then_accounts_and_transport_parse() {
    // GIVEN
    let dir = write_config(
        r#"
[transport]
timeout_secs = 5

[[accounts]]
name = "work"
protocol = "atom"
endpoint = "https://blog.example.com/app/service"
identity_env = "WORK_USER"
secret_env = "WORK_PASSWORD"
category_scheme = "http://example.com/tags"

[[accounts]]
name = "side"
protocol = "json-rest"
endpoint = "https://api.example.com/v3/"
identity_env = "SIDE_USER"
secret_env = "SIDE_TOKEN"
api_key_env = "SIDE_KEY"
"#,
    );

    // WHEN
    let config = BlogwireConfig::load(dir.path()).unwrap();

    // THEN
    assert_eq!(config.accounts.len(), 2);
    let work = config.account("work").unwrap();
    assert_eq!(work.protocol, ProtocolKind::Atom);
    assert_eq!(work.category_scheme.as_deref(), Some("http://example.com/tags"));
    assert_eq!(config.account("side").unwrap().protocol, ProtocolKind::JsonRest);
    assert!(config.account("missing").is_none());

    let settings = config.transport.settings();
    assert_eq!(settings.timeout, Duration::from_secs(5));
    assert_eq!(settings.connect_timeout, Duration::from_secs(10));
}

#[test]
fn given_corrupt_toml_when_loading_then_parse_error() {
    let dir = write_config("[[accounts]\nname = ");

    let result = BlogwireConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_unknown_protocol_when_loading_then_parse_error() {
    let dir = write_config(
        r#"
[[accounts]]
name = "old"
protocol = "metaweblog"
endpoint = "https://blog.example.com/xmlrpc"
identity_env = "U"
secret_env = "P"
"#,
    );

    assert!(matches!(
        BlogwireConfig::load(dir.path()),
        Err(ConfigError::ParseError { .. })
    ));
}

/// **BUG THIS CATCHES**: Two accounts with one name, where lookups would
/// silently pick the first.
#[test]
fn given_duplicate_account_names_when_loading_then_validation_error() {
    let account = r#"
[[accounts]]
name = "dup"
protocol = "wsse-atom"
endpoint = "https://blog.example.com/atom"
identity_env = "U"
secret_env = "P"
"#;
    let dir = write_config(&format!("{account}{account}"));

    match BlogwireConfig::load(dir.path()) {
        Err(ConfigError::ValidationError { reason, .. }) => assert!(reason.contains("dup")),
        other => panic!("expected ValidationError, got {other:?}"),
    }
}

#[test]
fn given_relative_endpoint_when_loading_then_validation_error() {
    let dir = write_config(
        r#"
[[accounts]]
name = "bad"
protocol = "atom"
endpoint = "/app/service"
identity_env = "U"
secret_env = "P"
"#,
    );

    assert!(matches!(
        BlogwireConfig::load(dir.path()),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_zero_timeout_when_validating_then_validation_error() {
    let mut config = BlogwireConfig::default();
    config.transport.timeout_secs = 0;

    assert!(matches!(config.validate(), Err(ConfigError::ValidationError { .. })));
}
