pub mod sqlite;

pub use sqlite::{CatalogItem, SqliteStorage};
