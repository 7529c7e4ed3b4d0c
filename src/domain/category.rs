use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Topical category assigned to an item.
///
/// Declaration order is significant: it is the order feeds are generated in
/// and the tie-break order used by the keyword classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Tech,
    Humanities,
    Design,
    Entertainment,
    Other,
}

impl Category {
    /// Every category, fallback last.
    pub const ALL: [Category; 5] = [
        Category::Tech,
        Category::Humanities,
        Category::Design,
        Category::Entertainment,
        Category::Other,
    ];

    /// The categories a classifier can actively choose.
    pub const SUBSTANTIVE: [Category; 4] = [
        Category::Tech,
        Category::Humanities,
        Category::Design,
        Category::Entertainment,
    ];

    pub const FALLBACK: Category = Category::Other;

    /// Display label, also the form stored in the database and emitted in feeds.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Tech => "科技",
            Category::Humanities => "人文",
            Category::Design => "设计",
            Category::Entertainment => "娱乐",
            Category::Other => "其他",
        }
    }

    /// English slug, used only for output file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Tech => "tech",
            Category::Humanities => "humanities",
            Category::Design => "design",
            Category::Entertainment => "entertainment",
            Category::Other => "others",
        }
    }

    /// Short gloss used when describing the taxonomy to a language model.
    pub fn gloss(&self) -> &'static str {
        match self {
            Category::Tech => "技术、编程、科学、AI、软件、硬件等",
            Category::Humanities => "文学、历史、哲学、社会、文化等",
            Category::Design => "UI/UX、平面设计、产品设计、艺术、摄影等",
            Category::Entertainment => "游戏、影视、音乐、综艺、体育等",
            Category::Other => "不属于以上类别的内容",
        }
    }

    /// Exact label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Exact label lookup, coercing anything outside the taxonomy to the fallback.
    pub fn from_label_or_fallback(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::FALLBACK)
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::FALLBACK
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label_or_fallback(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn test_unknown_label_is_none() {
        assert_eq!(Category::from_label("科技 "), None);
        assert_eq!(Category::from_label("tech"), None);
        assert_eq!(Category::from_label_or_fallback("news"), Category::Other);
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut slugs: Vec<_> = Category::ALL.iter().map(|c| c.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), Category::ALL.len());
    }

    #[test]
    fn test_fallback_is_last_and_not_substantive() {
        assert_eq!(Category::ALL.last(), Some(&Category::FALLBACK));
        assert!(!Category::SUBSTANTIVE.contains(&Category::FALLBACK));
        assert!(Category::Other.is_fallback());
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Category::Design).unwrap();
        assert_eq!(json, "\"设计\"");
        let parsed: Category = serde_json::from_str("\"娱乐\"").unwrap();
        assert_eq!(parsed, Category::Entertainment);
        let coerced: Category = serde_json::from_str("\"sports\"").unwrap();
        assert_eq!(coerced, Category::Other);
    }
}
