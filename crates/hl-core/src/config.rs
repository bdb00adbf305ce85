//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. environment variables
//! 2. the `[highlevel]` section of `highlevel.toml`
//! 3. defaults
//!
//! `${VAR_NAME}` inside the TOML file is expanded from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Default configuration file looked up by [`HighLevelConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "highlevel.toml";

/// HighLevel API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighLevelConfig {
    /// Default API key (private integration token or location token)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `Version` header required by the v2 API
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Emit per call diagnostics from the contacts layer
    #[serde(default)]
    pub log_enabled: bool,
}

impl Default for HighLevelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            log_enabled: false,
        }
    }
}

fn default_base_url() -> String {
    "https://services.leadconnectorhq.com".to_string()
}

fn default_api_version() -> String {
    "2021-07-28".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl HighLevelConfig {
    /// Override the base URL (mock servers, sandboxes)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Toggle the contacts layer diagnostics
    pub fn with_log_enabled(mut self, log_enabled: bool) -> Self {
        self.log_enabled = log_enabled;
        self
    }

    /// Set the default API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Expand `${VAR_NAME}` references from the environment.
    ///
    /// Unknown variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse a TOML document containing a `[highlevel]` table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::expand_env_vars(content);

        let file: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Ok(file.highlevel.unwrap_or_default().into())
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Load `highlevel.toml` from the working directory if present,
    /// otherwise configure from the environment only
    pub fn load() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(api_key) = std::env::var("HIGHLEVEL_API_KEY") {
            if !api_key.is_empty() {
                self.api_key = Some(api_key);
            }
        }

        if let Ok(base_url) = std::env::var("HIGHLEVEL_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }

        if let Ok(version) = std::env::var("HIGHLEVEL_API_VERSION") {
            if !version.is_empty() {
                self.api_version = version;
            }
        }

        if let Ok(timeout) = std::env::var("HIGHLEVEL_TIMEOUT_SECS") {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::Config(format!("HIGHLEVEL_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }

        if let Ok(enabled) = std::env::var("HIGHLEVEL_LOG_ENABLED") {
            self.log_enabled = parse_bool(&enabled);
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// ============================================================================
// TOML file layout
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    highlevel: Option<TomlHighLevelConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlHighLevelConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    log_enabled: Option<bool>,
}

impl From<TomlHighLevelConfig> for HighLevelConfig {
    fn from(toml: TomlHighLevelConfig) -> Self {
        Self {
            api_key: toml.api_key.filter(|key| !key.is_empty()),
            base_url: toml.base_url.unwrap_or_else(default_base_url),
            api_version: toml.api_version.unwrap_or_else(default_api_version),
            timeout_secs: toml.timeout_secs.unwrap_or_else(default_timeout_secs),
            log_enabled: toml.log_enabled.unwrap_or(false),
        }
    }
}
