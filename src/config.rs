//! Configuration module for corkboard.

use serde::Deserialize;
use std::path::Path;

use crate::{CorkboardError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/corkboard.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the profile image storage directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Maximum profile image size in megabytes.
    #[serde(default = "default_max_image_size")]
    pub max_image_size_mb: u64,
}

fn default_storage_path() -> String {
    "data/images".to_string()
}

fn default_max_image_size() -> u64 {
    5
}

impl FilesConfig {
    /// Maximum profile image size in bytes, saturating at `u64::MAX`.
    pub fn max_image_size_bytes(&self) -> u64 {
        self.max_image_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            max_image_size_mb: default_max_image_size(),
        }
    }
}

/// Board listing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Number of boards per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    3
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/corkboard.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Board listing configuration.
    #[serde(default)]
    pub board: BoardConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CorkboardError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CorkboardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CORKBOARD_DATABASE_PATH`: Override the database path
    /// - `CORKBOARD_STORAGE_PATH`: Override the image storage directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CORKBOARD_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(path) = std::env::var("CORKBOARD_STORAGE_PATH") {
            if !path.is_empty() {
                self.files.storage_path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the page size or the image size limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.board.page_size == 0 {
            return Err(CorkboardError::Config(
                "board.page_size must be greater than zero".to_string(),
            ));
        }
        if self.files.max_image_size_mb == 0 {
            return Err(CorkboardError::Config(
                "files.max_image_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
