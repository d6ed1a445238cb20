use crate::error::AuthError;

use common::RedactedSecret;

use std::env;
use std::path::PathBuf;

use log::{debug, info, warn};

/// Identity plus secret for one account. The secret never prints.
#[derive(Debug, Clone)]
pub struct Credentials {
    identity: String,
    secret: RedactedSecret,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: RedactedSecret::new(secret.into()),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn secret(&self) -> &str {
        self.secret.expose()
    }
}

/// Where a client gets its credentials from.
pub trait CredentialStore: Send + Sync {
    fn credentials(&self) -> Result<Credentials, AuthError>;
}

/// Fixed credentials, mostly for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    credentials: Credentials,
}

impl StaticCredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        Ok(self.credentials.clone())
    }
}

/// Reads identity and secret from environment variables.
///
/// A `.env` file in the working directory (or next to the executable) is
/// loaded first if present; variables already set in the process win.
#[derive(Debug, Clone)]
pub struct EnvCredentialStore {
    identity_env: String,
    secret_env: String,
}

impl EnvCredentialStore {
    pub fn new(identity_env: impl Into<String>, secret_env: impl Into<String>) -> Self {
        Self {
            identity_env: identity_env.into(),
            secret_env: secret_env.into(),
        }
    }

    fn read(name: &str) -> Result<String, AuthError> {
        match env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            Ok(_) => Err(AuthError::credentials_unavailable(format!(
                "environment variable '{name}' is empty"
            ))),
            Err(_) => Err(AuthError::credentials_unavailable(format!(
                "environment variable '{name}' is not set"
            ))),
        }
    }
}

impl CredentialStore for EnvCredentialStore {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        if try_load_dotenv().is_none() {
            debug!("No .env file found - using process environment only");
        }

        let identity = Self::read(&self.identity_env)?;
        let secret = Self::read(&self.secret_env)?;

        debug!(
            "Resolved credentials for '{}' from {}",
            identity, self.identity_env
        );
        Ok(Credentials::new(identity, secret))
    }
}

/// Look for a `.env` in the current directory, then beside the executable.
pub(crate) fn try_load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {path:?}");
        return Some(path);
    }

    let exe_dir = env::current_exe().ok()?.parent()?.to_path_buf();
    let env_path = exe_dir.join(".env");
    if !env_path.exists() {
        return None;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {env_path:?}");
            Some(env_path)
        }
        Err(e) => {
            warn!("Failed to parse .env at {env_path:?}: {e}");
            None
        }
    }
}
