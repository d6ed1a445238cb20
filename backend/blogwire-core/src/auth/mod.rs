//! Request signing.
//!
//! A signer mutates an outgoing [`RequestAttempt`] so that it carries
//! credentials in the scheme a service expects. Signers run on every hop of
//! a redirect chain, after all other headers are in place.
//!
//! Every header goes through [`attach_header`], which refuses values
//! containing CR or LF so credential material can never smuggle extra
//! header lines onto the wire.

mod basic;
mod credentials;
mod wsse;

pub use basic::{AnonymousSigner, BasicSigner, BearerSigner};
pub use credentials::{CredentialStore, Credentials, EnvCredentialStore, StaticCredentialStore};
pub(crate) use credentials::try_load_dotenv;
pub use wsse::{AuthContext, Clock, NonceSource, SystemClock, UuidNonceSource, WsseSigner};

use crate::error::AuthError;
use crate::executor::RequestAttempt;

use reqwest::header::{HeaderName, HeaderValue};

pub trait AuthSigner: Send + Sync {
    /// Short scheme name for logs ("basic", "wsse", ...).
    fn scheme(&self) -> &'static str;

    fn sign(
        &self,
        attempt: &mut RequestAttempt,
        credentials: &Credentials,
    ) -> Result<(), AuthError>;
}

/// Insert `name: value`, replacing any existing value.
///
/// # Errors
///
/// [`AuthError::HeaderInjection`] when `value` contains CR or LF,
/// [`AuthError::InvalidHeader`] when it is otherwise not a legal header value.
pub fn attach_header(
    attempt: &mut RequestAttempt,
    name: HeaderName,
    value: &str,
) -> Result<(), AuthError> {
    if value.contains(['\r', '\n']) {
        return Err(AuthError::header_injection(name.as_str()));
    }

    let value = HeaderValue::from_str(value)
        .map_err(|e| AuthError::invalid_header(name.as_str(), e.to_string()))?;

    attempt.headers.insert(name, value);
    Ok(())
}
