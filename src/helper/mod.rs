//! Git help assistant - matches user text against the topic catalog.

pub mod catalog;
pub mod matcher;
pub mod message;
pub mod telegram;
pub mod typing;


pub use catalog::{Catalog, CatalogError, GreetingEntry, TopicEntry};
pub use matcher::{Matcher, Outcome, FALLBACK_REPLY};
pub use message::InboundMessage;
pub use telegram::{Delivery, TelegramClient};
