//! Configuration module for StreamPanel
//!
//! A single TOML file holds the connection target and poll tuning, stored
//! in the platform-appropriate config directory under `streampanel`:
//!
//! - **Linux**: `~/.config/streampanel/config.toml`
//! - **macOS**: `~/Library/Application Support/streampanel/config.toml`
//! - **Windows**: `%APPDATA%\streampanel\config.toml`
//!
//! Every field has a default, so a partial (or absent) file works; an
//! unreadable file falls back to defaults with a warning.

use crate::client::Endpoint;
use crate::error::{PanelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "streampanel";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Default engine host
pub const DEFAULT_HOST: &str = "localhost";

/// Default engine control port
pub const DEFAULT_PORT: u16 = 1234;

/// Default listing poll interval in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default per-command read timeout in milliseconds; 0 disables the timeout
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 5000;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the engine's control protocol listens
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Poll loop tuning
    #[serde(default)]
    pub poll: PollConfig,
}

/// Engine connection target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Hostname or address
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port of the control protocol
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ConnectionConfig {
    /// The configured target as an [`Endpoint`]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }
}

/// Poll loop tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Listing poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,

    /// Per-command read timeout in milliseconds; 0 disables the timeout
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            command_timeout_ms: default_command_timeout_ms(),
        }
    }
}

impl PollConfig {
    /// Poll interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Command timeout as a [`Duration`], `None` when disabled
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_ms > 0).then(|| Duration::from_millis(self.command_timeout_ms))
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_command_timeout_ms() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_MS
}

/// Get the application config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

impl AppConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            PanelError::Config("could not determine the config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PanelError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&text)
            .map_err(|e| PanelError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load from the default location, falling back to defaults
    ///
    /// A missing file is normal on first run; anything else is warned about.
    pub fn load_or_default() -> Self {
        match config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring unreadable config, using defaults");
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Save to the default location
    pub fn save(&self) -> Result<()> {
        let path = config_path().ok_or_else(|| {
            PanelError::Config("could not determine the config directory".to_string())
        })?;
        self.save_to(&path)
    }

    /// Save to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PanelError::Config(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let text = toml::to_string_pretty(self)
            .map_err(|e| PanelError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, text)
            .map_err(|e| PanelError::Config(format!("failed to write {}: {}", path.display(), e)))
    }
}
