//! WS-Security UsernameToken signing (the "WSSE" header used by Atom APIs).
//!
//! ```text
//! Authorization: WSSE profile="UsernameToken"
//! X-WSSE: UsernameToken Username="alice", PasswordDigest="...", Created="...", Nonce="..."
//! ```
//!
//! `PasswordDigest` is `base64(sha1(nonce + created + secret))` over the raw
//! nonce text; the `Nonce` field carries `base64(nonce)`. A fresh nonce and
//! timestamp are drawn for every signed attempt.

use crate::auth::{AuthSigner, Credentials, attach_header};
use crate::error::AuthError;
use crate::executor::RequestAttempt;

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{AUTHORIZATION, HeaderName};
use sha1::{Digest, Sha1};
use uuid::Uuid;

const WSSE_HEADER: HeaderName = HeaderName::from_static("x-wsse");
const WSSE_AUTHORIZATION: &str = "WSSE profile=\"UsernameToken\"";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> String;
}

/// Random v4 UUID in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonceSource;

impl NonceSource for UuidNonceSource {
    fn next_nonce(&self) -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

/// Everything that goes into one UsernameToken.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: String,
    pub secret: String,
    pub nonce: String,
    /// UTC, `YYYY-MM-DDTHH:MM:SSZ`.
    pub created: String,
}

impl AuthContext {
    pub fn new(
        credentials: &Credentials,
        nonce: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            identity: credentials.identity().to_string(),
            secret: credentials.secret().to_string(),
            nonce: nonce.into(),
            created: created.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn digest(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.nonce.as_bytes());
        hasher.update(self.created.as_bytes());
        hasher.update(self.secret.as_bytes());
        STANDARD.encode(hasher.finalize())
    }

    pub fn header_value(&self) -> String {
        format!(
            "UsernameToken Username=\"{}\", PasswordDigest=\"{}\", Created=\"{}\", Nonce=\"{}\"",
            self.identity,
            self.digest(),
            self.created,
            STANDARD.encode(self.nonce.as_bytes()),
        )
    }
}

#[derive(Clone)]
pub struct WsseSigner {
    clock: Arc<dyn Clock>,
    nonces: Arc<dyn NonceSource>,
}

impl Default for WsseSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl WsseSigner {
    pub fn new() -> Self {
        Self::with_sources(Arc::new(SystemClock), Arc::new(UuidNonceSource))
    }

    pub fn with_sources(clock: Arc<dyn Clock>, nonces: Arc<dyn NonceSource>) -> Self {
        Self { clock, nonces }
    }
}

impl AuthSigner for WsseSigner {
    fn scheme(&self) -> &'static str {
        "wsse"
    }

    fn sign(
        &self,
        attempt: &mut RequestAttempt,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        let context = AuthContext::new(credentials, self.nonces.next_nonce(), self.clock.now());
        let token = context.header_value();

        // Checked up front: no half-signed attempts.
        if token.contains(['\r', '\n']) {
            return Err(AuthError::header_injection(WSSE_HEADER.as_str()));
        }

        attach_header(attempt, AUTHORIZATION, WSSE_AUTHORIZATION)?;
        attach_header(attempt, WSSE_HEADER, &token)
    }
}
