//! Configuration management
//!
//! Settings come from `~/.config/nosql-tui/config.toml` when present, then
//! environment variables override individual keys. The file is never written.
//! Priority: NOSQL_TUI_* environment variable > config.toml > built-in default

use super::Result;
use crate::error::StorageError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "localhost";
pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_FETCH_SIZE: usize = 100;
pub const DEFAULT_FETCH_MORE_THRESHOLD: usize = 10;
pub const DEFAULT_LEFT_PANE_WIDTH: u16 = 50;
pub const DEFAULT_COPY_MESSAGE_MS: u64 = 2000;

const MIN_LEFT_PANE_WIDTH: u16 = 30;

const ENV_ENDPOINT: &str = "NOSQL_TUI_ENDPOINT";
const ENV_PORT: &str = "NOSQL_TUI_PORT";
const ENV_FETCH_SIZE: &str = "NOSQL_TUI_FETCH_SIZE";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    pub endpoint: String,
    pub port: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            port: DEFAULT_PORT.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DataConfig {
    /// Rows requested per fetch (`LIMIT`).
    pub fetch_size: usize,
    /// Remaining rows below the cursor that trigger a prefetch.
    pub fetch_more_threshold: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fetch_size: DEFAULT_FETCH_SIZE,
            fetch_more_threshold: DEFAULT_FETCH_MORE_THRESHOLD,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Content width of the left pane column.
    pub left_pane_width: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_pane_width: DEFAULT_LEFT_PANE_WIDTH,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub copy_message_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_message_ms: DEFAULT_COPY_MESSAGE_MS,
        }
    }
}

/// Application configuration
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub data: DataConfig,
    pub layout: LayoutConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from file, falling back to defaults when it does not exist.
    ///
    /// Environment overrides and validation are applied to the result.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        let mut config = Self::read_file(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate();
        Ok(config)
    }

    fn read_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            log::debug!("No config file at {}", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to parse config file: {}", e),
        })
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join("nosql-tui").join("config.toml"))
    }

    /// Apply NOSQL_TUI_* overrides read through `lookup`. Unparseable values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|s| !s.trim().is_empty()) {
            self.connection.endpoint = endpoint.trim().to_string();
        }
        if let Some(port) = lookup(ENV_PORT).filter(|s| s.trim().parse::<u16>().is_ok()) {
            self.connection.port = port.trim().to_string();
        }
        if let Some(size) = lookup(ENV_FETCH_SIZE).and_then(|s| s.trim().parse::<usize>().ok()) {
            self.data.fetch_size = size;
        }
    }

    /// Reset out-of-range values to their defaults.
    pub fn validate(&mut self) {
        if self.data.fetch_size == 0 {
            log::warn!("fetch_size must be at least 1, using {}", DEFAULT_FETCH_SIZE);
            self.data.fetch_size = DEFAULT_FETCH_SIZE;
        }
        if self.data.fetch_more_threshold >= self.data.fetch_size {
            let fallback = DEFAULT_FETCH_MORE_THRESHOLD.min(self.data.fetch_size - 1);
            log::warn!(
                "fetch_more_threshold {} must be below fetch_size {}, using {}",
                self.data.fetch_more_threshold,
                self.data.fetch_size,
                fallback
            );
            self.data.fetch_more_threshold = fallback;
        }
        if self.layout.left_pane_width < MIN_LEFT_PANE_WIDTH {
            log::warn!(
                "left_pane_width {} is below {}, using {}",
                self.layout.left_pane_width,
                MIN_LEFT_PANE_WIDTH,
                DEFAULT_LEFT_PANE_WIDTH
            );
            self.layout.left_pane_width = DEFAULT_LEFT_PANE_WIDTH;
        }
    }
}
