use std::path::{Path, PathBuf};

use crate::app::{AppContext, Result, SluiceError};
use crate::classifier::ClassificationDispatcher;
use crate::domain::{Item, Subscription};
use crate::feed::{self, FeedKey};
use crate::store::Store;

pub fn subscribe(
    ctx: &AppContext,
    url: &str,
    title: Option<String>,
    platform: Option<String>,
) -> Result<()> {
    url::Url::parse(url)?;

    if let Some(existing) = ctx.store.get_subscription(url)? {
        println!(
            "Already subscribed: {} ({})",
            existing.display_title(),
            existing.platform_key()
        );
        return Ok(());
    }

    let mut subscription = Subscription::new(url);
    subscription.title = title;
    subscription.platform = platform;
    ctx.store.add_subscription(&subscription)?;
    println!("Subscribed: {}", subscription.display_title());
    Ok(())
}

pub fn unsubscribe(ctx: &AppContext, url: &str) -> Result<()> {
    if !ctx.store.remove_subscription(url)? {
        return Err(SluiceError::SubscriptionNotFound(url.to_string()));
    }
    println!("Unsubscribed: {}", url);
    Ok(())
}

/// Load items handed over by ingestion as a JSON array.
pub fn import_items(ctx: &AppContext, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let items: Vec<Item> = serde_json::from_str(&content)?;

    if items.is_empty() {
        println!("No items found in {}", path.display());
        return Ok(());
    }

    let added = ctx.store.add_items(&items)?;
    println!(
        "Imported {} items ({} already present)",
        added,
        items.len() - added
    );
    Ok(())
}

pub async fn classify(
    ctx: &AppContext,
    all: bool,
    batch_size: Option<usize>,
    keyword_only: bool,
) -> Result<()> {
    let items = if all {
        ctx.store.get_all_items()?
    } else {
        ctx.store.get_unclassified_items()?
    };

    if items.is_empty() {
        println!("No items to classify");
        return Ok(());
    }

    let mut config = ctx.config.classifier.clone();
    if keyword_only {
        config.use_llm = false;
    }

    let dispatcher = ClassificationDispatcher::from_config(&config)?;
    println!(
        "Classifying {} items with the {} classifier...",
        items.len(),
        dispatcher.classifier_name()
    );

    let classified = match batch_size {
        Some(size) => dispatcher.classify_in_batches(items, size).await,
        None => dispatcher.classify_batch(items).await,
    };
    let updated = ctx.store.set_categories(&classified)?;
    println!("Classified {} items", updated);

    for (category, count) in ctx.store.category_counts()? {
        println!("  {:<6} {}", category.label(), count);
    }
    Ok(())
}

pub fn generate(ctx: &AppContext, output_dir: Option<PathBuf>, opml: Option<PathBuf>) -> Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| ctx.config.feed.output_dir.clone());
    let items = ctx.store.get_all_items()?;

    let feeds = feed::generate_categorized(&items, &output_dir, &ctx.config.feed.channel());
    println!("Generated {} feeds from {} items:", feeds.paths.len(), items.len());
    for (key, path) in &feeds.paths {
        let marker = if *key == FeedKey::Master { "*" } else { " " };
        println!(" {} {:<8} {}", marker, key.to_string(), path.display());
    }
    for (key, error) in &feeds.failures {
        eprintln!("  ! {} - {}", key, error);
    }

    let subscriptions = ctx.store.get_all_subscriptions()?;
    let opml_path = opml.unwrap_or_else(|| output_dir.join(&ctx.config.opml.file_name));
    match feed::generate_opml(&subscriptions, &opml_path, &ctx.config.opml.title) {
        Ok(path) => println!(
            "Generated OPML with {} subscriptions: {}",
            subscriptions.len(),
            path.display()
        ),
        Err(e) => eprintln!("  ! OPML - {}", e),
    }

    Ok(())
}

pub async fn run(ctx: &AppContext, output_dir: Option<PathBuf>) -> Result<()> {
    classify(ctx, false, None, false).await?;
    generate(ctx, output_dir, None)
}

pub fn list_items(ctx: &AppContext) -> Result<()> {
    let items = ctx.store.get_all_items()?;

    if items.is_empty() {
        println!("No items");
        return Ok(());
    }

    for item in items {
        let category = item
            .category
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| "--".to_string());
        let date = item
            .pub_date
            .as_ref()
            .and_then(|d| feed::date::normalize(d).ok())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());

        println!("[{}] {} {}", category, date, item.title);
    }

    Ok(())
}

pub fn list_subscriptions(ctx: &AppContext) -> Result<()> {
    let subscriptions = ctx.store.get_all_subscriptions()?;

    if subscriptions.is_empty() {
        println!("No subscriptions");
        return Ok(());
    }

    for sub in subscriptions {
        println!(
            "{} ({})\n  {}",
            sub.display_title(),
            sub.platform_key(),
            sub.url
        );
    }

    Ok(())
}
