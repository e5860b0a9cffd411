//! Configuration for xlate
//!
//! Loaded from, in order:
//! 1. CLI `--config` argument
//! 2. `~/.config/xlate/config.{XLATE_ENV}.json`
//! 3. Default values
//!
//! `XLATE_ENV` can be `production` (default), `development` or `test`.
//!
//! # Examples
//!
//! ```no_run
//! use xlate::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! println!("Backend: {} ({} rows per page)", config.server_url, config.page_size);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! Environment variables override config file values:
//! - XLATE_SERVER_URL
//! - XLATE_PAGE_SIZE

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the translation service
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Rows per history page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout. Uploads wait for the whole translation, so this is generous.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Where downloaded results are written (defaults to the user's download dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Interface language ("en" or "zh", defaults to system locale)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default)]
    pub debug: bool,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
            download_dir: None,
            language: None,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with standard priority:
    /// 1. Explicit path
    /// 2. ~/.config/xlate/config.{XLATE_ENV}.json
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                tracing::info!("Loading config from: {:?}", path);
                return Self::from_file(path);
            }
            return Err(ConfigError::ValidationError(format!(
                "Config file not found: {:?}",
                path
            )));
        }

        let env = std::env::var("XLATE_ENV").unwrap_or_else(|_| "production".to_string());

        if let Some(config_dir) = Self::config_dir() {
            let config_path = config_dir.join(format!("config.{}.json", env));
            if config_path.exists() {
                tracing::info!("Loading config from: {:?}", config_path);
                return Self::from_file(&config_path);
            }
        }

        tracing::info!("Using default configuration with environment overrides");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("XLATE_SERVER_URL") {
            self.server_url = url;
        }

        if let Ok(size) = std::env::var("XLATE_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(size) => self.page_size = size,
                Err(_) => tracing::warn!("Ignoring non-numeric XLATE_PAGE_SIZE={:?}", size),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server_url cannot be empty".to_string(),
            ));
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "server_url must start with http:// or https://, got {}",
                self.server_url
            )));
        }

        if self.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "page_size must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("xlate"))
    }

    /// Directory holding the preference store.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("xlate"))
            .unwrap_or_else(|| PathBuf::from(".xlate"))
    }

    /// Resolved download directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
