pub mod category;
pub mod item;
pub mod subscription;

pub use category::Category;
pub use item::{Item, PubDate};
pub use subscription::{Subscription, DEFAULT_PLATFORM};
