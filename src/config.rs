//! Server configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (`--config`, `CONTACTS_CONFIG`, or `./contacts.toml`)
//! 3. Environment variables (CONTACTS_* prefix)
//!
//! Environment variables take precedence over config file values. The
//! binary applies command-line flags last.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::DEFAULT_FIRST_ID;

/// Environment variable prefix
const ENV_PREFIX: &str = "CONTACTS";

/// Config file looked up in the working directory when none is named.
const DEFAULT_CONFIG_FILE: &str = "contacts.toml";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// First value of the id allocation counter
    #[serde(default = "default_first_id")]
    pub first_id: u64,

    /// Start the store with the fixture contact (id 1000)
    #[serde(default = "default_true")]
    pub seed_test_contact: bool,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            first_id: default_first_id(),
            seed_test_contact: true,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_path(&Self::config_file_path()),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // CONTACTS_BIND
        if let Ok(val) = std::env::var(format!("{}_BIND", ENV_PREFIX)) {
            self.bind = val;
        }

        // CONTACTS_FIRST_ID
        if let Ok(val) = std::env::var(format!("{}_FIRST_ID", ENV_PREFIX)) {
            self.first_id = val
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}_FIRST_ID: {:?}", ENV_PREFIX, val))?;
        }

        // CONTACTS_SEED
        if let Ok(val) = std::env::var(format!("{}_SEED", ENV_PREFIX)) {
            self.seed_test_contact = val.eq_ignore_ascii_case("true") || val == "1";
        }

        // CONTACTS_LOG
        if let Ok(val) = std::env::var(format!("{}_LOG", ENV_PREFIX)) {
            self.log_level = val;
        }

        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with CONTACTS_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_first_id() -> u64 {
    DEFAULT_FIRST_ID
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
