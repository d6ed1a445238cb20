use blogwire_core::error::{ConfigError, CoreError, ExecutorError, ProtocolError};

use common::HttpStatusCode;

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};
use std::path::PathBuf;

/// **VALUE**: Errors built through the constructors carry the caller's
/// file/line/column.
///
/// **WHY THIS MATTERS**: A redirect failure deep inside a publish call is
/// only debuggable if the message says where it was raised.
///
/// **BUG THIS CATCHES**: Would catch if someone:
/// - Removes `#[track_caller]` from a constructor
/// - Drops `{location}` from a Display string
#[test]
fn given_redirect_limit_error_when_formatted_then_includes_caller_location() {
    // GIVEN
    let err = ExecutorError::redirect_limit_exceeded("https://blog.example.com/a", 50);

    // WHEN
    let message = err.to_string();

    // THEN
    assert!(message.contains("Redirect Limit Exceeded Error"));
    assert!(message.contains("https://blog.example.com/a"));
    assert!(message.contains("error.rs"), "{message}");
}

/// **VALUE**: Executor errors stay inspectable after the protocol layer
/// wraps them.
#[test]
fn given_executor_error_when_wrapped_then_protocol_error_is_transparent() {
    let inner = ExecutorError::invalid_redirect("https://blog.example.com/a", HttpStatusCode(302));
    let inner_message = inner.to_string();

    let err = ProtocolError::from(inner);

    assert_eq!(err.to_string(), inner_message);
    assert!(matches!(err, ProtocolError::Executor(ExecutorError::InvalidRedirect { .. })));
}

/// **VALUE**: Huge error pages do not end up verbatim in logs.
#[test]
fn given_large_body_when_http_status_error_built_then_body_is_truncated() {
    let body = "x".repeat(10_000);

    let err = ProtocolError::http_status("https://blog.example.com/", HttpStatusCode(500), &body);

    match err {
        ProtocolError::HttpStatus { body, status, .. } => {
            assert!(body.chars().count() <= 515, "{}", body.len());
            assert_eq!(status.0, 500);
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

/// **BUG THIS CATCHES**: Would catch if `#[source]` is dropped from
/// `ConfigError::ReadError`, hiding the OS reason behind a generic message.
#[test]
fn given_read_error_when_source_requested_then_io_error_is_preserved() {
    let err = ConfigError::ReadError {
        location: common::ErrorLocation::caller(),
        path: PathBuf::from("/nowhere/blogwire.toml"),
        source: IoError::new(ErrorKind::PermissionDenied, "permission denied"),
    };

    let source = err.source().expect("source is kept");

    assert!(source.to_string().contains("permission denied"));
    assert!(err.to_string().contains("/nowhere/blogwire.toml"));
}

#[test]
fn given_layer_errors_when_collected_as_core_error_then_messages_pass_through() {
    let protocol = ProtocolError::unsupported("json-rest", "get_categories");
    let expected = protocol.to_string();

    let err = CoreError::from(protocol);

    assert_eq!(err.to_string(), expected);
    assert!(matches!(err, CoreError::Protocol(ProtocolError::UnsupportedOperation { .. })));
}
