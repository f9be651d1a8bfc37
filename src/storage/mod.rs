mod json_store;
mod kv;
mod saved;
mod schema;
mod types;

pub use json_store::JsonStore;
pub use saved::{SavedArticles, SAVED_ARTICLES_KEY};
pub use schema::Database;
pub use types::DatabaseError;
