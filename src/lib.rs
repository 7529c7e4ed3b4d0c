//! # Sluice
//!
//! Sorts syndicated items into topical categories and publishes them as
//! static RSS 2.0 feeds plus an OPML subscription list.
//!
//! ## Architecture
//!
//! ```text
//! Store → ClassificationDispatcher → Partitioner → RSS / OPML writers
//! ```
//!
//! - [`classifier`]: hosted-model classifier with keyword fallback
//! - [`feed`]: RSS and OPML document generation
//! - [`store`]: SQLite persistence for items and subscriptions
//!
//! ## Quick Start
//!
//! ```bash
//! # Track a feed
//! sluice subscribe https://blog.rust-lang.org/feed.xml --platform blog
//!
//! # Load items and publish
//! sluice import items.json
//! sluice run --output-dir ./public
//! ```

/// Application context and error handling.
pub mod app;

/// Item classification.
///
/// - [`Classifier`](classifier::Classifier): single-item contract
/// - [`KeywordClassifier`](classifier::KeywordClassifier): bilingual keyword scoring
/// - [`LlmClassifier`](classifier::LlmClassifier): hosted language model
/// - [`ClassificationDispatcher`](classifier::ClassificationDispatcher): batch runner and factory
pub mod classifier;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/sluice/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Category`](domain::Category): the closed taxonomy
/// - [`Item`](domain::Item): one piece of syndicated content
/// - [`Subscription`](domain::Subscription): a tracked feed endpoint
pub mod domain;

/// RSS 2.0 feeds, per-category partitioning and OPML export.
pub mod feed;

/// SQLite persistence layer.
pub mod store;
