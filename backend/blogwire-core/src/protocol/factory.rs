use crate::auth::{CredentialStore, try_load_dotenv};
use crate::config::AccountConfig;
use crate::error::{AuthError, ProtocolError};
use crate::executor::{ReqwestTransport, RequestExecutor, TransportSettings};
use crate::protocol::ProtocolClient;
use crate::protocol::atom::{
    AtomClient, AtomProfile, BloggerAtomProfile, GenericAtomProfile, WsseAtomProfile,
};
use crate::protocol::json::JsonRestClient;

use std::env;
use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

/// Wire protocol of an account, as written in `blogwire.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolKind {
    Atom,
    BloggerAtom,
    WsseAtom,
    JsonRest,
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolKind::Atom => "atom",
            ProtocolKind::BloggerAtom => "blogger-atom",
            ProtocolKind::WsseAtom => "wsse-atom",
            ProtocolKind::JsonRest => "json-rest",
        };
        f.write_str(name)
    }
}

/// Build the client variant for `account`.
///
/// # Errors
///
/// - [`ProtocolError::UrlParse`] for an unparsable endpoint
/// - [`ProtocolError::Executor`] when the HTTP client cannot be built
/// - [`ProtocolError::Auth`] when `api_key_env` names an unset variable
pub fn build_client(
    account: &AccountConfig,
    settings: &TransportSettings,
    credentials: Arc<dyn CredentialStore>,
) -> Result<Box<dyn ProtocolClient>, ProtocolError> {
    let endpoint = Url::parse(&account.endpoint)?;
    let executor = RequestExecutor::new(Arc::new(ReqwestTransport::new(settings)?));

    debug!(
        "Building {} client for account '{}' at {}",
        account.protocol, account.name, endpoint
    );

    let atom = |profile: Box<dyn AtomProfile>| -> Box<dyn ProtocolClient> {
        Box::new(AtomClient::new(
            profile,
            endpoint.clone(),
            executor.clone(),
            Arc::clone(&credentials),
        ))
    };

    let client = match account.protocol {
        ProtocolKind::Atom => {
            atom(Box::new(GenericAtomProfile::new(account.category_scheme.clone())))
        }
        ProtocolKind::BloggerAtom => atom(Box::new(BloggerAtomProfile::new())),
        ProtocolKind::WsseAtom => atom(Box::new(WsseAtomProfile::default())),
        ProtocolKind::JsonRest => {
            let api_key = account.api_key_env.as_deref().map(read_api_key).transpose()?;
            Box::new(JsonRestClient::new(
                endpoint.clone(),
                api_key,
                executor.clone(),
                Arc::clone(&credentials),
            ))
        }
    };

    Ok(client)
}

/// API keys follow the same lookup as [`crate::auth::EnvCredentialStore`]:
/// `.env` first, then the process environment.
fn read_api_key(name: &str) -> Result<String, AuthError> {
    if try_load_dotenv().is_none() {
        debug!("No .env file found - reading API key from process environment");
    }

    env::var(name)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            AuthError::credentials_unavailable(format!(
                "environment variable '{name}' is not set"
            ))
        })
}
