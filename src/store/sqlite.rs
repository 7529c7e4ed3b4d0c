use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, SluiceError};
use crate::domain::{Category, Item, PubDate, Subscription};
use crate::store::Store;

const ITEM_COLUMNS: &str = "item_id, title, description, link, pub_date, platform, category";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations.to_latest(&mut conn)?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            SluiceError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
        Ok(Item {
            item_id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            link: row.get(3)?,
            pub_date: row.get::<_, Option<String>>(4)?.map(PubDate::Text),
            platform: row.get(5)?,
            category: row
                .get::<_, Option<String>>(6)?
                .map(|label| Category::from_label_or_fallback(&label)),
        })
    }

    fn row_to_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
        Ok(Subscription {
            url: row.get(0)?,
            title: row.get(1)?,
            platform: row.get(2)?,
            created_at: row
                .get::<_, String>(3)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        })
    }

    fn query_items(&self, filter: &str) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items {} ORDER BY seq",
            ITEM_COLUMNS, filter
        ))?;

        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }
}

impl Store for SqliteStore {
    fn add_subscription(&self, subscription: &Subscription) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO subscriptions (url, title, platform, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                subscription.url,
                subscription.title,
                subscription.platform,
                subscription.created_at.to_rfc3339()
            ],
        )?;
        Ok(inserted > 0)
    }

    fn remove_subscription(&self, url: &str) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM subscriptions WHERE url = ?1", params![url])?;
        Ok(removed > 0)
    }

    fn get_subscription(&self, url: &str) -> Result<Option<Subscription>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                "SELECT url, title, platform, created_at FROM subscriptions WHERE url = ?1",
                params![url],
                Self::row_to_subscription,
            )
            .optional()?;
        Ok(result)
    }

    fn get_all_subscriptions(&self) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT url, title, platform, created_at FROM subscriptions ORDER BY created_at, rowid",
        )?;

        let subscriptions = stmt
            .query_map([], Self::row_to_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    fn add_items(&self, items: &[Item]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut count = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO items
                 (guid, item_id, title, description, link, pub_date, platform, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for item in items {
                count += stmt.execute(params![
                    item.guid(),
                    item.item_id,
                    item.title,
                    item.description,
                    item.link,
                    item.pub_date.as_ref().map(PubDate::to_storage_string),
                    item.platform,
                    item.category.map(|c| c.label()),
                    now,
                ])?;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    fn get_all_items(&self) -> Result<Vec<Item>> {
        self.query_items("")
    }

    fn get_unclassified_items(&self) -> Result<Vec<Item>> {
        self.query_items("WHERE category IS NULL")
    }

    fn set_categories(&self, items: &[Item]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;

        {
            let mut stmt = tx.prepare("UPDATE items SET category = ?1 WHERE guid = ?2")?;
            for item in items {
                if let Some(category) = item.category {
                    count += stmt.execute(params![category.label(), item.guid()])?;
                }
            }
        }

        tx.commit()?;
        Ok(count)
    }

    fn category_counts(&self) -> Result<Vec<(Category, i64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT category, COUNT(*) FROM items GROUP BY category")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut counts: Vec<(Category, i64)> = Category::ALL.iter().map(|c| (*c, 0)).collect();
        for (label, n) in rows {
            let category = label
                .as_deref()
                .map(Category::from_label_or_fallback)
                .unwrap_or(Category::FALLBACK);
            if let Some(entry) = counts.iter_mut().find(|(c, _)| *c == category) {
                entry.1 += n;
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> Item {
        let mut item = Item::new(title, format!("https://example.com/{}", id));
        item.item_id = Some(id.to_string());
        item
    }

    #[test]
    fn test_add_and_get_subscription() {
        let store = SqliteStore::in_memory().unwrap();
        let mut sub = Subscription::new("https://example.com/feed.xml");
        sub.platform = Some("blog".into());
        assert!(store.add_subscription(&sub).unwrap());

        let retrieved = store.get_subscription(&sub.url).unwrap().unwrap();
        assert_eq!(retrieved.url, "https://example.com/feed.xml");
        assert_eq!(retrieved.platform.as_deref(), Some("blog"));
        assert!(retrieved.title.is_none());
    }

    #[test]
    fn test_duplicate_subscription_ignored() {
        let store = SqliteStore::in_memory().unwrap();
        let sub = Subscription::new("https://example.com/feed.xml");
        assert!(store.add_subscription(&sub).unwrap());
        assert!(!store.add_subscription(&sub).unwrap());
        assert_eq!(store.get_all_subscriptions().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_subscription() {
        let store = SqliteStore::in_memory().unwrap();
        let sub = Subscription::new("https://example.com/feed.xml");
        store.add_subscription(&sub).unwrap();
        assert!(store.remove_subscription(&sub.url).unwrap());
        assert!(!store.remove_subscription(&sub.url).unwrap());
        assert!(store.get_subscription(&sub.url).unwrap().is_none());
    }

    #[test]
    fn test_items_are_deduplicated_and_ordered() {
        let store = SqliteStore::in_memory().unwrap();
        let first = vec![item("b", "Second"), item("a", "First")];
        assert_eq!(store.add_items(&first).unwrap(), 2);

        let again = vec![item("a", "First again"), item("c", "Third")];
        assert_eq!(store.add_items(&again).unwrap(), 1);

        let titles: Vec<_> = store
            .get_all_items()
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First", "Third"]);
    }

    #[test]
    fn test_item_without_id_dedupes_on_link() {
        let store = SqliteStore::in_memory().unwrap();
        let items = vec![
            Item::new("One", "https://example.com/x"),
            Item::new("Two", "https://example.com/x"),
        ];
        assert_eq!(store.add_items(&items).unwrap(), 1);
    }

    #[test]
    fn test_item_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let mut original = item("id-1", "Title");
        original.description = Some("Body".into());
        original.pub_date = Some(PubDate::Unix(1_705_314_600));
        original.platform = Some("youtube".into());
        original.category = Some(Category::Design);
        store.add_items(std::slice::from_ref(&original)).unwrap();

        let stored = store.get_all_items().unwrap().remove(0);
        assert_eq!(stored.item_id.as_deref(), Some("id-1"));
        assert_eq!(stored.description.as_deref(), Some("Body"));
        assert_eq!(
            stored.pub_date,
            Some(PubDate::Text("2024-01-15T10:30:00+00:00".into()))
        );
        assert_eq!(stored.category, Some(Category::Design));
    }

    #[test]
    fn test_set_categories_and_unclassified() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .add_items(&[item("a", "A"), item("b", "B"), item("c", "C")])
            .unwrap();
        assert_eq!(store.get_unclassified_items().unwrap().len(), 3);

        let classified = vec![
            item("a", "A").with_category(Category::Tech),
            item("c", "C").with_category(Category::Other),
        ];
        assert_eq!(store.set_categories(&classified).unwrap(), 2);

        let pending = store.get_unclassified_items().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "B");

        let counts = store.category_counts().unwrap();
        assert_eq!(counts[0], (Category::Tech, 1));
        // the unclassified item counts toward the fallback bucket
        assert_eq!(counts[4], (Category::Other, 2));
    }
}
