use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::{rss, ChannelMeta, FeedError};
use crate::domain::{Category, Item};

pub const MASTER_FILE_NAME: &str = "feed.xml";

/// Identifies one generated document: a category feed or the master feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeedKey {
    Category(Category),
    Master,
}

impl FeedKey {
    pub fn file_name(&self) -> String {
        match self {
            FeedKey::Category(category) => format!("{}_feed.xml", category.slug()),
            FeedKey::Master => MASTER_FILE_NAME.to_string(),
        }
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKey::Category(category) => f.write_str(category.label()),
            FeedKey::Master => f.write_str("master"),
        }
    }
}

/// Outcome of one multi-document run.
#[derive(Debug, Default)]
pub struct CategorizedFeeds {
    pub paths: BTreeMap<FeedKey, PathBuf>,
    pub failures: Vec<(FeedKey, FeedError)>,
}

impl CategorizedFeeds {
    pub fn get(&self, key: FeedKey) -> Option<&Path> {
        self.paths.get(&key).map(PathBuf::as_path)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Bucket items by category. Every category gets an entry, empty or not;
/// unclassified items go to the fallback bucket.
pub fn group_by_category(items: &[Item]) -> BTreeMap<Category, Vec<&Item>> {
    let mut groups: BTreeMap<Category, Vec<&Item>> =
        Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
    for item in items {
        groups
            .entry(item.category_or_fallback())
            .or_default()
            .push(item);
    }
    groups
}

/// Channel for a single category's feed, derived from the master channel.
pub fn category_channel(base: &ChannelMeta, category: Category) -> ChannelMeta {
    ChannelMeta {
        title: format!("Universal RSS - {}", category.label()),
        link: base.link.clone(),
        description: format!("{}类内容聚合", category.label()),
    }
}

/// Write one feed per category plus the master feed into `output_dir`.
///
/// A document that fails to write is recorded in
/// [`CategorizedFeeds::failures`]; the remaining documents are still written.
pub fn generate_categorized(
    items: &[Item],
    output_dir: &Path,
    channel: &ChannelMeta,
) -> CategorizedFeeds {
    let mut result = CategorizedFeeds::default();

    for (category, group) in group_by_category(items) {
        let key = FeedKey::Category(category);
        let path = output_dir.join(key.file_name());
        tracing::debug!(category = %category, items = group.len(), "Generating category feed");
        record(
            &mut result,
            key,
            rss::generate(group, &path, &category_channel(channel, category)),
        );
    }

    let path = output_dir.join(FeedKey::Master.file_name());
    record(&mut result, FeedKey::Master, rss::generate(items, &path, channel));

    result
}

fn record(result: &mut CategorizedFeeds, key: FeedKey, outcome: super::Result<PathBuf>) {
    match outcome {
        Ok(path) => {
            result.paths.insert(key, path);
        }
        Err(e) => {
            tracing::error!(feed = %key, error = %e, "Failed to generate feed");
            result.failures.push((key, e));
        }
    }
}
