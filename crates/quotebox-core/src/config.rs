//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/quotebox/config.toml)
//! 3. Environment variables (QUOTEBOX_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::notice::DEFAULT_NOTICE_TTL;
use crate::sync::{DEFAULT_SYNC_INTERVAL, DEFAULT_SYNC_URL};

/// Environment variable prefix
const ENV_PREFIX: &str = "QUOTEBOX";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for durable storage (quotes snapshot, category filter)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Endpoint polled for server quotes
    #[serde(default = "default_sync_url")]
    pub sync_url: Option<String>,

    /// Whether server sync runs at all
    #[serde(default = "default_true")]
    pub sync_enabled: bool,

    /// Seconds between sync cycles in a `run` session
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    /// Seconds a notification stays visible
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,

    /// Write logs here instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sync_url: default_sync_url(),
            sync_enabled: true,
            sync_interval_secs: default_sync_interval_secs(),
            notice_secs: default_notice_secs(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (QUOTEBOX_DATA_DIR, QUOTEBOX_SYNC_URL,
    ///    QUOTEBOX_SYNC_ENABLED, QUOTEBOX_SYNC_INTERVAL)
    /// 2. Config file (~/.config/quotebox/config.toml or QUOTEBOX_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
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

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // Empty string clears the URL, which disables sync
        if let Ok(val) = std::env::var(format!("{}_SYNC_URL", ENV_PREFIX)) {
            self.sync_url = if val.is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var(format!("{}_SYNC_ENABLED", ENV_PREFIX)) {
            self.sync_enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        // Unparseable values are ignored
        if let Ok(val) = std::env::var(format!("{}_SYNC_INTERVAL", ENV_PREFIX)) {
            if let Ok(secs) = val.trim().parse::<u64>() {
                if secs > 0 {
                    self.sync_interval_secs = secs;
                }
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with QUOTEBOX_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quotebox")
            .join("config.toml")
    }

    /// Sync runs only when enabled and an endpoint is set
    pub fn sync_active(&self) -> bool {
        self.sync_enabled && self.sync_url.is_some()
    }

    /// Time between sync cycles
    pub fn sync_interval(&self) -> Duration {
        if self.sync_interval_secs == 0 {
            DEFAULT_SYNC_INTERVAL
        } else {
            Duration::from_secs(self.sync_interval_secs)
        }
    }

    /// How long notifications stay visible
    pub fn notice_ttl(&self) -> Duration {
        if self.notice_secs == 0 {
            DEFAULT_NOTICE_TTL
        } else {
            Duration::from_secs(self.notice_secs)
        }
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotebox")
}

fn default_sync_url() -> Option<String> {
    Some(DEFAULT_SYNC_URL.to_string())
}

fn default_true() -> bool {
    true
}

fn default_sync_interval_secs() -> u64 {
    DEFAULT_SYNC_INTERVAL.as_secs()
}

fn default_notice_secs() -> u64 {
    DEFAULT_NOTICE_TTL.as_secs()
}
