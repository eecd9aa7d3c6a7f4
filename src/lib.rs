//! Music catalog store.
//!
//! Persists artists, genres, albums, songs, listeners and ratings in SQLite,
//! loads them in batches that report rejected entries, and answers ranking
//! queries over the stored data.

pub mod catalog_store;
pub mod config;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogError, CatalogStore, SqliteCatalogStore, StoreOptions};
pub use config::{AppConfig, CliConfig, FileConfig};
