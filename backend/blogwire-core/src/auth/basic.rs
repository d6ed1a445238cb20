use crate::auth::{AuthSigner, Credentials, attach_header};
use crate::error::AuthError;
use crate::executor::RequestAttempt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::AUTHORIZATION;

/// Leaves the request untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSigner;

impl AuthSigner for AnonymousSigner {
    fn scheme(&self) -> &'static str {
        "anonymous"
    }

    fn sign(
        &self,
        _attempt: &mut RequestAttempt,
        _credentials: &Credentials,
    ) -> Result<(), AuthError> {
        Ok(())
    }
}

/// `Authorization: Basic base64(identity:secret)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSigner;

impl AuthSigner for BasicSigner {
    fn scheme(&self) -> &'static str {
        "basic"
    }

    fn sign(
        &self,
        attempt: &mut RequestAttempt,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        if credentials.identity().contains(':') {
            return Err(AuthError::invalid_header(
                AUTHORIZATION.as_str(),
                "basic auth identity must not contain ':'",
            ));
        }

        let token = STANDARD.encode(format!("{}:{}", credentials.identity(), credentials.secret()));
        attach_header(attempt, AUTHORIZATION, &format!("Basic {token}"))
    }
}

/// `Authorization: Bearer <secret>`. The identity is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerSigner;

impl AuthSigner for BearerSigner {
    fn scheme(&self) -> &'static str {
        "bearer"
    }

    fn sign(
        &self,
        attempt: &mut RequestAttempt,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        attach_header(attempt, AUTHORIZATION, &format!("Bearer {}", credentials.secret()))
    }
}
