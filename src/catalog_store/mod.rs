mod analytics;
mod error;
mod ingest;
mod models;
mod reset;
mod resolver;
mod schema;
mod store;
mod trait_def;
mod validation;

pub use error::CatalogError;
pub use models::*;
pub use resolver::EntityKind;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::{SqliteCatalogStore, StoreOptions};
pub use trait_def::CatalogStore;
pub use validation::{MAX_SCORE, MIN_SCORE};
