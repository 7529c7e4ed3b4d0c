pub mod sqlite;

use crate::app::Result;
use crate::domain::{Category, Item, Subscription};

pub use sqlite::SqliteStore;

pub trait Store {
    // Subscription operations
    fn add_subscription(&self, subscription: &Subscription) -> Result<bool>;
    fn remove_subscription(&self, url: &str) -> Result<bool>;
    fn get_subscription(&self, url: &str) -> Result<Option<Subscription>>;
    fn get_all_subscriptions(&self) -> Result<Vec<Subscription>>;

    // Item operations
    fn add_items(&self, items: &[Item]) -> Result<usize>;
    fn get_all_items(&self) -> Result<Vec<Item>>;
    fn get_unclassified_items(&self) -> Result<Vec<Item>>;
    fn set_categories(&self, items: &[Item]) -> Result<usize>;
    fn category_counts(&self) -> Result<Vec<(Category, i64)>>;
}
