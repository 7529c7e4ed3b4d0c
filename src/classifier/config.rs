use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Configuration for classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Prefer the hosted model over keyword matching (default: true)
    pub use_llm: bool,

    /// API credential; `ANTHROPIC_API_KEY` is consulted when unset
    pub api_key: Option<String>,

    /// Base URL of the messages API
    pub api_url: String,

    /// Model used for classification
    pub model: String,

    /// Items classified per batch (default: 10)
    pub batch_size: usize,

    /// Pause between batches in milliseconds (default: 1000)
    pub pause_ms: u64,

    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            use_llm: true,
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            pause_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl ClassifierConfig {
    /// Keyword matching only, no pause between batches
    pub fn offline() -> Self {
        Self {
            use_llm: false,
            pause_ms: 0,
            ..Default::default()
        }
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Batch size, never zero
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ClassifierConfig::default();
        assert!(config.use_llm);
        assert!(config.api_key.is_none());
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.pause(), Duration::from_secs(1));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_offline_config() {
        let config = ClassifierConfig::offline();
        assert!(!config.use_llm);
        assert_eq!(config.pause(), Duration::ZERO);
        assert_eq!(config.batch_size, 10);
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let config = ClassifierConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_batch_size(), 1);
    }
}
