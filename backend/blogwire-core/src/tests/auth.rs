// Unit tests for signers and the header attachment guard

use crate::auth::{
    AuthContext, AuthSigner, BasicSigner, BearerSigner, Clock, Credentials, NonceSource,
    WsseSigner, attach_header,
};
use crate::error::AuthError;
use crate::executor::RequestAttempt;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderName};
use url::Url;

const NONCE: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
const NONCE_BASE64: &str = "N2M5ZTY2NzktNzQyNS00MGRlLTk0NGItZTA3ZmMxZjkwYWU3";
const DIGEST: &str = "v4Ho1fbNB+ZMzklrKRZDyBvVTi0=";

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }
}

/// Hands out the given nonces in order, then repeats the last one.
struct ScriptedNonces {
    nonces: Vec<&'static str>,
    next: AtomicUsize,
}

impl ScriptedNonces {
    fn new(nonces: Vec<&'static str>) -> Self {
        Self {
            nonces,
            next: AtomicUsize::new(0),
        }
    }
}

impl NonceSource for ScriptedNonces {
    fn next_nonce(&self) -> String {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.nonces[i.min(self.nonces.len() - 1)].to_string()
    }
}

fn attempt() -> RequestAttempt {
    RequestAttempt::new(Method::GET, Url::parse("https://blog.example.com/feed").unwrap())
}

fn wsse(nonces: Vec<&'static str>) -> WsseSigner {
    WsseSigner::with_sources(Arc::new(FixedClock), Arc::new(ScriptedNonces::new(nonces)))
}

/// **VALUE**: Pins the digest and header layout to known values.
///
/// **WHY THIS MATTERS**: WSSE servers recompute the digest byte for byte; any
/// change in operand order, encoding or timestamp format locks users out.
#[test]
fn given_fixed_clock_and_nonce_when_wsse_signs_then_header_matches_known_value() {
    // GIVEN
    let signer = wsse(vec![NONCE]);
    let credentials = Credentials::new("alice", "s3cret");
    let mut attempt = attempt();

    // WHEN
    signer.sign(&mut attempt, &credentials).expect("sign");

    // THEN
    assert_eq!(
        attempt.header("x-wsse"),
        Some(
            format!(
                "UsernameToken Username=\"alice\", PasswordDigest=\"{DIGEST}\", \
                 Created=\"2024-01-02T03:04:05Z\", Nonce=\"{NONCE_BASE64}\""
            )
            .as_str()
        )
    );
    assert_eq!(
        attempt.header("authorization"),
        Some("WSSE profile=\"UsernameToken\"")
    );
}

#[test]
fn given_auth_context_when_digest_then_uses_nonce_created_secret_order() {
    let context = AuthContext::new(&Credentials::new("alice", "s3cret"), NONCE, FixedClock.now());

    assert_eq!(context.created, "2024-01-02T03:04:05Z");
    assert_eq!(context.digest(), DIGEST);
}

/// **VALUE**: Each attempt gets a fresh nonce, so digests never repeat.
///
/// **BUG THIS CATCHES**: Caching the token across redirect hops would make
/// servers reject the second hop as a replay.
#[test]
fn given_same_credentials_when_nonce_changes_then_digest_changes() {
    let signer = wsse(vec![NONCE, "00000000-0000-4000-8000-000000000001"]);
    let credentials = Credentials::new("alice", "s3cret");

    let mut first = attempt();
    let mut second = attempt();
    signer.sign(&mut first, &credentials).expect("sign");
    signer.sign(&mut second, &credentials).expect("sign");

    assert_ne!(first.header("x-wsse"), second.header("x-wsse"));
    assert!(
        second
            .header("x-wsse")
            .unwrap()
            .contains("PasswordDigest=\"dK+Tg++nEmaJppRQ1LDxVuFGYMQ=\"")
    );
}

/// **VALUE**: Line breaks in the identity never reach the wire.
///
/// **WHY THIS MATTERS**: A CR/LF inside a header value would let a crafted
/// identity inject arbitrary headers.
///
/// **BUG THIS CATCHES**: Attaching Authorization before validating the token
/// would leave a half-signed request behind.
#[test]
fn given_identity_with_line_feed_when_wsse_signs_then_header_injection_and_no_headers() {
    // GIVEN
    let signer = wsse(vec![NONCE]);
    let credentials = Credentials::new("alice\nX-Evil: 1", "s3cret");
    let mut attempt = attempt();

    // WHEN
    let result = signer.sign(&mut attempt, &credentials);

    // THEN
    assert!(matches!(result, Err(AuthError::HeaderInjection { .. })));
    assert!(attempt.headers.is_empty(), "nothing may be attached");
}

#[test]
fn given_value_with_carriage_return_when_attach_header_then_rejected() {
    let mut attempt = attempt();

    let result = attach_header(&mut attempt, HeaderName::from_static("x-test"), "a\rb");

    assert!(matches!(
        result,
        Err(AuthError::HeaderInjection { ref header, .. }) if header == "x-test"
    ));
    assert!(attempt.headers.is_empty());
}

#[test]
fn given_credentials_when_basic_signs_then_authorization_is_base64_pair() {
    let mut attempt = attempt();

    BasicSigner
        .sign(&mut attempt, &Credentials::new("alice", "s3cret"))
        .expect("sign");

    assert_eq!(
        attempt.header(AUTHORIZATION.as_str()),
        Some("Basic YWxpY2U6czNjcmV0")
    );
}

#[test]
fn given_token_when_bearer_signs_then_identity_is_ignored() {
    let mut attempt = attempt();

    BearerSigner
        .sign(&mut attempt, &Credentials::new("ignored", "tok-123"))
        .expect("sign");

    assert_eq!(attempt.header("authorization"), Some("Bearer tok-123"));
}

#[test]
fn given_credentials_when_debug_formatted_then_secret_is_redacted() {
    let credentials = Credentials::new("alice", "s3cret");

    let debug = format!("{credentials:?}");

    assert!(debug.contains("alice"));
    assert!(!debug.contains("s3cret"));
}
