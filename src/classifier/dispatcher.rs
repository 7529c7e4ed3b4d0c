use std::time::Duration;

use super::config::{ClassifierConfig, DEFAULT_BATCH_SIZE};
use super::error::{ClassifierError, Result};
use super::keyword::KeywordClassifier;
use super::llm::LlmClassifier;
use super::Classifier;
use crate::domain::{Category, Item};

/// Runs one classifier over item batches, pausing between batches to stay
/// under the upstream call rate.
pub struct ClassificationDispatcher {
    classifier: Box<dyn Classifier>,
    batch_size: usize,
    pause: Duration,
}

impl ClassificationDispatcher {
    /// Pick the classifier once: the hosted model when requested and a
    /// credential resolves, keyword matching otherwise. Only a missing
    /// credential triggers the substitution; other construction errors are
    /// returned.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let classifier: Box<dyn Classifier> = if config.use_llm {
            match LlmClassifier::from_config(config) {
                Ok(llm) => Box::new(llm),
                Err(ClassifierError::MissingCredential) => {
                    tracing::warn!("No API key found, falling back to keyword classifier");
                    Box::new(KeywordClassifier::new())
                }
                Err(e) => return Err(e),
            }
        } else {
            Box::new(KeywordClassifier::new())
        };

        Ok(Self::with_classifier(classifier)
            .batch_size(config.effective_batch_size())
            .pause(config.pause()))
    }

    pub fn with_classifier(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            batch_size: DEFAULT_BATCH_SIZE,
            pause: Duration::from_secs(1),
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Name of the active classifier.
    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub async fn classify(&self, title: &str, description: &str) -> Category {
        self.classifier.classify(title, description).await
    }

    /// Classify every item, in order, and hand the collection back with each
    /// `category` set. Uses the configured batch size.
    pub async fn classify_batch(&self, items: Vec<Item>) -> Vec<Item> {
        self.classify_in_batches(items, self.batch_size).await
    }

    /// Same as [`classify_batch`](Self::classify_batch) with an explicit batch
    /// size for this call. A size of 0 is treated as 1.
    pub async fn classify_in_batches(&self, items: Vec<Item>, batch_size: usize) -> Vec<Item> {
        let batch_size = batch_size.max(1);
        let total = items.len();
        let mut classified = Vec::with_capacity(total);
        let mut remaining = items.into_iter().peekable();
        let mut batch = 0;

        while remaining.peek().is_some() {
            if batch > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            for mut item in remaining.by_ref().take(batch_size) {
                let category = self
                    .classifier
                    .classify(&item.title, item.description_text())
                    .await;
                item.category = Some(category);
                classified.push(item);
            }

            batch += 1;
            tracing::debug!(batch, done = classified.len(), total, "Classified batch");
        }

        let fallback = classified
            .iter()
            .filter(|item| item.category == Some(Category::FALLBACK))
            .count();
        tracing::info!(
            classifier = self.classifier.name(),
            total,
            fallback,
            "Classification complete"
        );

        classified
    }
}
