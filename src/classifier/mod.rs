//! Two-tier classification: a hosted language model when a credential is
//! available, keyword matching otherwise.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod keyword;
pub mod llm;

use async_trait::async_trait;

use crate::domain::Category;

pub use client::{AnthropicClient, CompletionClient, CompletionRequest};
pub use config::ClassifierConfig;
pub use dispatcher::ClassificationDispatcher;
pub use error::ClassifierError;
pub use keyword::KeywordClassifier;
pub use llm::{Classification, Confidence, LlmClassifier};

/// Only this many characters of a description are looked at.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Assigns a single taxonomy category to an item. Never fails: anything that
/// goes wrong maps to [`Category::FALLBACK`].
#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, title: &str, description: &str) -> Category;
}

/// The leading part of a description that classifiers consume.
pub(crate) fn classification_input(description: &str) -> &str {
    match description.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((idx, _)) => &description[..idx],
        None => description,
    }
}
