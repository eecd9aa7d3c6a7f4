use thiserror::Error;

/// Failures that abort a load instead of being reported as a rejection.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Album songs are not deduplicated, so a title the artist already owns
    /// hits the (title, artist) uniqueness constraint.
    #[error("Song '{title}' by '{artist}' already exists")]
    SongConflict { title: String, artist: String },

    #[error("Catalog schema mismatch: {0}")]
    SchemaMismatch(String),
}
