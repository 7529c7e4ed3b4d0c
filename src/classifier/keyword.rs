use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{classification_input, Classifier};
use crate::domain::Category;

/// Scores text against per-category keyword sets. No I/O, never fails.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    // BTreeMap keeps categories in declaration order, which is the tie-break order.
    keywords: BTreeMap<Category, Vec<String>>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::with_keywords(default_keywords())
    }

    /// Build from custom keyword lists. Entries for the fallback category are
    /// ignored and keywords are deduplicated case-insensitively per category.
    pub fn with_keywords<I, K, S>(table: I) -> Self
    where
        I: IntoIterator<Item = (Category, K)>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: BTreeMap<Category, Vec<String>> = BTreeMap::new();
        for (category, words) in table {
            if category.is_fallback() {
                continue;
            }
            let entry = keywords.entry(category).or_default();
            for word in words {
                let word = word.as_ref().to_lowercase();
                if !word.is_empty() && !entry.contains(&word) {
                    entry.push(word);
                }
            }
        }
        Self { keywords }
    }

    /// Hit count per substantive category, in declaration order.
    pub fn scores(&self, title: &str, description: &str) -> Vec<(Category, usize)> {
        let text = format!("{} {}", title, classification_input(description)).to_lowercase();
        self.keywords
            .iter()
            .map(|(category, words)| {
                let hits = words.iter().filter(|w| text.contains(w.as_str())).count();
                (*category, hits)
            })
            .collect()
    }

    /// Category with the strictly highest hit count; the earlier-declared
    /// category wins a tie. Fallback when nothing matches.
    pub fn classify_text(&self, title: &str, description: &str) -> Category {
        let mut best = (Category::FALLBACK, 0);
        for (category, hits) in self.scores(title, description) {
            if hits > best.1 {
                best = (category, hits);
            }
        }
        best.0
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn classify(&self, title: &str, description: &str) -> Category {
        self.classify_text(title, description)
    }
}

fn default_keywords() -> Vec<(Category, Vec<&'static str>)> {
    vec![
        (
            Category::Tech,
            vec![
                "技术", "编程", "代码", "AI", "人工智能", "软件", "硬件", "科学", "算法",
                "tech", "code", "programming", "software", "hardware",
            ],
        ),
        (
            Category::Humanities,
            vec![
                "文学", "历史", "哲学", "社会", "文化", "人文", "思想", "书籍",
                "literature", "history", "philosophy", "culture",
            ],
        ),
        (
            Category::Design,
            vec![
                "设计", "UI", "UX", "平面", "产品", "艺术", "摄影", "视觉",
                "design", "art", "photography", "visual",
            ],
        ),
        (
            Category::Entertainment,
            vec![
                "游戏", "影视", "电影", "音乐", "综艺", "体育", "娱乐",
                "game", "movie", "music", "entertainment", "sport",
            ],
        ),
    ]
}
