use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// Publish date as handed over by ingestion: either free text or a native
/// timestamp. Normalization happens when a feed is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PubDate {
    Text(String),
    /// Seconds since the Unix epoch.
    Unix(i64),
    Timestamp(DateTime<Utc>),
}

impl From<&str> for PubDate {
    fn from(s: &str) -> Self {
        PubDate::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for PubDate {
    fn from(dt: DateTime<Utc>) -> Self {
        PubDate::Timestamp(dt)
    }
}

impl PubDate {
    /// Text form used for storage. Native timestamps are stored as RFC 3339.
    pub fn to_storage_string(&self) -> String {
        match self {
            PubDate::Text(s) => s.clone(),
            PubDate::Unix(secs) => DateTime::<Utc>::from_timestamp(*secs, 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| secs.to_string()),
            PubDate::Timestamp(dt) => dt.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub pub_date: Option<PubDate>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Item {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            item_id: None,
            title: title.into(),
            description: None,
            link: link.into(),
            pub_date: None,
            platform: None,
            category: None,
        }
    }

    /// Globally unique identifier: the item id, or the link when there is none.
    pub fn guid(&self) -> &str {
        self.item_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.link)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Category for grouping; unclassified items land in the fallback bucket.
    pub fn category_or_fallback(&self) -> Category {
        self.category.unwrap_or(Category::FALLBACK)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_prefers_item_id() {
        let mut item = Item::new("Title", "https://example.com/a");
        item.item_id = Some("abc-123".into());
        assert_eq!(item.guid(), "abc-123");
    }

    #[test]
    fn test_guid_falls_back_to_link() {
        let item = Item::new("Title", "https://example.com/a");
        assert_eq!(item.guid(), "https://example.com/a");

        let mut blank = Item::new("Title", "https://example.com/b");
        blank.item_id = Some(String::new());
        assert_eq!(blank.guid(), "https://example.com/b");
    }

    #[test]
    fn test_category_or_fallback() {
        let item = Item::new("Title", "");
        assert_eq!(item.category_or_fallback(), Category::Other);
        let item = item.with_category(Category::Design);
        assert_eq!(item.category_or_fallback(), Category::Design);
    }

    #[test]
    fn test_deserialize_minimal_item() {
        let item: Item = serde_json::from_str(r#"{"title": "Hello"}"#).unwrap();
        assert_eq!(item.title, "Hello");
        assert_eq!(item.link, "");
        assert!(item.category.is_none());
        assert!(item.pub_date.is_none());
    }

    #[test]
    fn test_deserialize_pub_date_variants() {
        let item: Item =
            serde_json::from_str(r#"{"title": "a", "pub_date": "2024-01-15T10:30:00Z"}"#).unwrap();
        assert_eq!(item.pub_date, Some(PubDate::Text("2024-01-15T10:30:00Z".into())));

        let item: Item = serde_json::from_str(r#"{"title": "a", "pub_date": 1705314600}"#).unwrap();
        assert_eq!(item.pub_date, Some(PubDate::Unix(1_705_314_600)));
    }

    #[test]
    fn test_storage_string_for_unix_timestamp() {
        let date = PubDate::Unix(1_705_314_600);
        assert_eq!(date.to_storage_string(), "2024-01-15T10:30:00+00:00");
    }
}
