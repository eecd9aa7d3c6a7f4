mod versioned_schema;

pub use versioned_schema::*;

/// Offset added to the schema version stored in `PRAGMA user_version`, so a
/// database created by another tool (user_version 0) is never mistaken for ours.
pub const BASE_DB_VERSION: usize = 7000;
