// Unit tests for error module
// The probe writes failures into its JSON report, so errors must serialize

use crate::error::ProbeError;

use blogwire_core::error::ProtocolError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that errors can be serialized next to the account reports.
///
/// **BUG THIS CATCHES**: Would catch if someone removes the `#[derive(Serialize)]`
/// or adds a field that cannot be serialized.
#[test]
fn given_probe_error_when_serialized_then_tagged_with_variant() {
    // GIVEN
    let err = ProbeError::Probe {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let json = serde_json::to_string(&err).unwrap();

    // THEN
    assert!(json.contains(r#""type":"Probe""#), "{json}");
    assert!(json.contains("Test"));
}

#[test]
fn given_protocol_error_when_converted_then_message_kept() {
    let err: ProbeError = ProtocolError::invalid_request("updating a post requires its id").into();

    match err {
        ProbeError::Protocol { message, .. } => assert!(message.contains("requires its id")),
        other => panic!("expected Protocol, got {other:?}"),
    }
}
