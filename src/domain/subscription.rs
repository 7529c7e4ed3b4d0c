use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform bucket for subscriptions that don't name one.
pub const DEFAULT_PLATFORM: &str = "other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            platform: None,
            created_at: Utc::now(),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.url)
    }

    pub fn platform_key(&self) -> &str {
        self.platform
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PLATFORM)
    }
}
