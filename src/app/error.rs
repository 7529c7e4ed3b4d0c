use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::config::ConfigError;
use crate::feed::FeedError;

#[derive(Error, Debug)]
pub enum SluiceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Feed generation error: {0}")]
    Feed(#[from] FeedError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid item data: {0}")]
    ItemData(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SluiceError>;
