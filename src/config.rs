//! PESO Configuration Module
//!
//! Manages persistent configuration for the backend location and session.
//! Config is stored in `~/.config/peso/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`PESO_BASE_URL`, `PESO_TIMEOUT_SECS`, `PESO_TOKEN_FILE`)
//! 2. Config file (`~/.config/peso/config.toml`)
//! 3. Defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PesoError, Result};
use crate::util::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PesoConfig {
    /// Where the REST backend lives and how long to wait for it
    #[serde(default)]
    pub backend: Backend,

    /// Where the bearer token is persisted
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backend {
    /// Base URL, e.g. `http://localhost:3005`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Page size requested by list bindings
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Session settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Token file override (default: `~/.config/peso/session.json`)
    pub token_file: Option<PathBuf>,
}

impl PesoConfig {
    /// Get the config directory path
    ///
    /// Returns `~/.config/peso/` on Unix, `%APPDATA%/peso/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("peso")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from the default path
    ///
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| PesoError::Config {
            reason: format!("Failed to read config file: {}", e),
        })?;

        toml::from_str(&content).map_err(|e| PesoError::Config {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| PesoError::Config {
                reason: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| PesoError::Config {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| PesoError::Config {
            reason: format!("Failed to write config file: {}", e),
        })
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    /// Empty or unparseable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("PESO_BASE_URL") {
            if !url.is_empty() {
                self.backend.base_url = url;
            }
        }

        if let Ok(secs) = std::env::var("PESO_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.backend.timeout_secs = Some(secs);
            }
        }

        if let Ok(file) = std::env::var("PESO_TOKEN_FILE") {
            if !file.is_empty() {
                self.session.token_file = Some(PathBuf::from(file));
            }
        }

        self
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.backend.timeout_secs.map(Duration::from_secs)
    }

    /// Effective token file
    pub fn token_file(&self) -> PathBuf {
        self.session
            .token_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("session.json"))
    }
}
