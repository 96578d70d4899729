//! Application configuration loading from config.toml
//!
//! The file is optional: every field has a default, so a missing file yields the stock
//! configuration. `INNOVATION_CONFIG` points at an alternative path.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP API listens on
    pub bind_addr: String,
    /// The fixed set of department names a record may belong to
    pub departments: Vec<String>,
    /// Password given to the seeded `admin` account when no users exist
    pub default_admin_password: String,
    /// Legacy `innovation_data.txt` file imported into an empty records table at startup
    pub legacy_records_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            departments: ["售前部", "售后部", "店长运营部", "生产部"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_admin_password: "admin123".to_string(),
            legacy_records_file: None,
        }
    }
}

impl AppConfig {
    /// Checks the values that cannot be expressed through serde defaults alone.
    pub fn validate(&self) -> Result<()> {
        if self.departments.is_empty() {
            return Err(Error::Config {
                message: "At least one department must be configured".to_string(),
            });
        }
        if self.departments.iter().any(|d| d.trim().is_empty()) {
            return Err(Error::Config {
                message: "Department names cannot be empty".to_string(),
            });
        }
        if self.default_admin_password.is_empty() {
            return Err(Error::Config {
                message: "default_admin_password cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The parsed values fail validation
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from `INNOVATION_CONFIG` or `./config.toml`, falling back to
/// defaults when the file does not exist.
pub fn load_app_config() -> Result<AppConfig> {
    let path = std::env::var("INNOVATION_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        load_config(&path)
    } else {
        info!(
            "No configuration file at {}, using defaults",
            path.display()
        );
        Ok(AppConfig::default())
    }
}
