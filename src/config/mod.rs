//! Configuration management for Sluice.
//!
//! Configuration is read from `~/.config/sluice/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod output;

pub use output::{FeedConfig, OpmlConfig};

use crate::classifier::ClassifierConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub feed: FeedConfig,
    pub opml: OpmlConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/sluice/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("sluice").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!(path = %path.display(), "Created default config");
        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Sluice Configuration

[classifier]
# Use the hosted language model when a credential is available.
# Falls back to keyword matching when no API key can be found.
use_llm = true

# API key; when unset, ANTHROPIC_API_KEY is read from the environment
# api_key = "sk-ant-..."

api_url = "https://api.anthropic.com"
model = "claude-3-5-haiku-20241022"

# Items classified per batch, and the pause between batches (milliseconds)
batch_size = 10
pause_ms = 1000

# Per-request timeout in seconds
timeout_secs = 30

[feed]
title = "Universal RSS Feed"
link = "https://localhost"
description = "Aggregated content from multiple platforms"

# Directory receiving feed.xml and the per-category feeds
output_dir = "."

[opml]
title = "Universal RSS Subscriptions"
file_name = "subscriptions.opml"

[storage]
# db_path = "/path/to/sluice.db"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
