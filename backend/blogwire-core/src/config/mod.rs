//! `blogwire.toml`: transport settings and the accounts to talk to.
//!
//! ```toml
//! [transport]
//! timeout_secs = 30
//!
//! [[accounts]]
//! name = "work"
//! protocol = "atom"
//! endpoint = "https://blog.example.com/app/service"
//! identity_env = "WORK_BLOG_USER"
//! secret_env = "WORK_BLOG_PASSWORD"
//! ```

use crate::BLOGWIRE_USER_AGENT;
use crate::error::ConfigError;
use crate::executor::TransportSettings;
use crate::protocol::ProtocolKind;

use common::ErrorLocation;

use std::collections::HashSet;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "blogwire.toml";
const CONFIG_DIR_NAME: &str = "blogwire";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl TransportConfig {
    pub fn settings(&self) -> TransportSettings {
        TransportSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// One blog account. Secrets live in the environment, never in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    pub protocol: ProtocolKind,
    pub endpoint: String,
    pub identity_env: String,
    pub secret_env: String,
    #[serde(default)]
    pub category_scheme: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogwireConfig {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    BLOGWIRE_USER_AGENT.to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl BlogwireConfig {
    /// `{config_dir}/blogwire` under the platform config directory.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or(ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Load `{config_dir}/blogwire.toml`.
    ///
    /// # Returns
    ///
    /// Defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file {}: {}", config_path.display(), e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: BlogwireConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!(
            "Config loaded from {} ({} account(s))",
            config_path.display(),
            config.accounts.len()
        );
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.timeout_secs == 0 {
            return Err(validation_error("transport.timeout_secs must be > 0"));
        }
        if self.transport.connect_timeout_secs == 0 {
            return Err(validation_error("transport.connect_timeout_secs must be > 0"));
        }

        let mut names = HashSet::new();
        for account in &self.accounts {
            account.validate()?;
            if !names.insert(account.name.as_str()) {
                return Err(validation_error(format!(
                    "Duplicate account name: {}",
                    account.name
                )));
            }
        }

        Ok(())
    }

    pub fn account(&self, name: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.name == name)
    }
}

impl AccountConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(validation_error("Account name cannot be empty"));
        }

        match Url::parse(&self.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(validation_error(format!(
                    "Account '{}': invalid endpoint URL: {}",
                    self.name, self.endpoint
                )));
            }
        }

        let env_names = [
            ("identity_env", Some(&self.identity_env)),
            ("secret_env", Some(&self.secret_env)),
            ("api_key_env", self.api_key_env.as_ref()),
        ];
        for (field, value) in env_names {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(validation_error(format!(
                    "Account '{}': {} cannot be empty",
                    self.name, field
                )));
            }
        }

        Ok(())
    }
}

#[track_caller]
fn validation_error(reason: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: reason.into(),
    }
}
