use crate::error::{Result, VersionBranchError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "versionbranch.toml";

/// Represents the complete configuration for version-branch.
///
/// Contains backend endpoints, the manifest location, request timeout and the
/// default branch-name prefix. Every field has a default, so an empty file is valid.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_raw_url")]
    pub raw_url: String,

    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub name_prefix: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_manifest_path() -> String {
    "package.json".to_string()
}

/// Remote calls fail fast rather than hang.
fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "version-branch".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            raw_url: default_raw_url(),
            manifest_path: default_manifest_path(),
            timeout_secs: default_timeout_secs(),
            name_prefix: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    fn validate(self) -> Result<Self> {
        if self.timeout_secs == 0 {
            return Err(VersionBranchError::config("timeout_secs must be greater than 0"));
        }
        if self.manifest_path.trim().is_empty() {
            return Err(VersionBranchError::config("manifest_path must not be empty"));
        }
        Ok(self)
    }
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text)
        .map_err(|e| VersionBranchError::config(format!("Invalid configuration: {}", e)))?;
    config.validate()
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versionbranch.toml` in current directory
/// 3. `~/.config/.versionbranch.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!("configuration file loaded");
    parse_config(&config_str)
}
