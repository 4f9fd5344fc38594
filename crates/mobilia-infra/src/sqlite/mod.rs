//! SQLite-backed repository implementations.

pub mod catalog;
pub mod chat;
pub mod pool;

pub use catalog::SqliteCatalogRepository;
pub use chat::SqliteChatRepository;
pub use pool::DatabasePool;
