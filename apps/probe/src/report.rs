//! Per-account probe: check credentials, list blogs, report.

use crate::error::ProbeError;

use blogwire_core::auth::{CredentialStore, EnvCredentialStore};
use blogwire_core::config::{AccountConfig, BlogwireConfig};
use blogwire_core::executor::TransportSettings;
use blogwire_core::protocol::{BlogInfo, ProtocolCapabilities, ProtocolKind, build_client};

use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;

/// Outcome for one account. `error` is set when a step failed; the steps
/// before it keep their results.
#[derive(Debug, Clone, Serialize)]
pub struct AccountReport {
    pub account: String,
    pub protocol: ProtocolKind,
    pub capabilities: Option<ProtocolCapabilities>,
    pub credentials_valid: Option<bool>,
    pub blogs: Vec<BlogInfo>,
    pub error: Option<String>,
}

impl AccountReport {
    fn new(account: &AccountConfig) -> Self {
        Self {
            account: account.name.clone(),
            protocol: account.protocol,
            capabilities: None,
            credentials_valid: None,
            blogs: Vec::new(),
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.credentials_valid == Some(true)
    }
}

/// Probe every configured account, reading secrets from the environment.
pub async fn probe_all(config: &BlogwireConfig) -> Vec<AccountReport> {
    let settings = config.transport.settings();
    let mut reports = Vec::with_capacity(config.accounts.len());

    for account in &config.accounts {
        let store: Arc<dyn CredentialStore> = Arc::new(EnvCredentialStore::new(
            account.identity_env.as_str(),
            account.secret_env.as_str(),
        ));
        reports.push(probe_account(account, &settings, store).await);
    }

    reports
}

/// Probe one account. Never fails; failures end up in the report.
pub async fn probe_account(
    account: &AccountConfig,
    settings: &TransportSettings,
    credentials: Arc<dyn CredentialStore>,
) -> AccountReport {
    let mut report = AccountReport::new(account);
    if let Err(e) = run_probe(account, settings, credentials, &mut report).await {
        error!("Account '{}' failed: {e}", account.name);
        report.error = Some(e.to_string());
    }
    report
}

async fn run_probe(
    account: &AccountConfig,
    settings: &TransportSettings,
    credentials: Arc<dyn CredentialStore>,
    report: &mut AccountReport,
) -> Result<(), ProbeError> {
    let client = build_client(account, settings, credentials)?;
    report.capabilities = Some(*client.capabilities());

    info!("Verifying credentials for '{}' ({})", account.name, account.protocol);
    let valid = client.verify_credentials().await?;
    report.credentials_valid = Some(valid);
    if !valid {
        warn!("Credentials rejected for '{}'", account.name);
        return Ok(());
    }

    report.blogs = client.get_blogs().await?;
    info!("'{}' has {} blog(s)", account.name, report.blogs.len());
    Ok(())
}
