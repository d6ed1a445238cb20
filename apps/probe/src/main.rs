use blogwire_probe::error::ProbeError;
use blogwire_probe::logger::{initialize as LoggerInitialize, level_from_env};
use blogwire_probe::report::probe_all;

use blogwire_core::config::BlogwireConfig;

use common::ErrorLocation;

use std::env;
use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

const LOG_DIR_NAME: &str = "logs";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every account verified.
async fn run() -> Result<bool, ProbeError> {
    // Usage: blogwire-probe [CONFIG_DIR]
    let config_dir = match env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => BlogwireConfig::default_dir()?,
    };

    let log_dir = config_dir.join(LOG_DIR_NAME);
    create_dir_all(&log_dir).map_err(|e| ProbeError::Probe {
        message: format!("Failed to create log directory {}: {e}", log_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir, level_from_env())?;

    info!("blogwire probe starting");
    info!("Config directory: {}", config_dir.display());

    let config = BlogwireConfig::load(&config_dir)?;
    if config.accounts.is_empty() {
        info!("No accounts configured, nothing to probe");
    }

    let reports = probe_all(&config).await;
    let json = serde_json::to_string_pretty(&reports).map_err(|e| ProbeError::Probe {
        message: format!("Failed to serialize report: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    println!("{json}");

    Ok(reports.iter().all(|r| r.is_ok()))
}
