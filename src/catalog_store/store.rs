//! SQLite-backed catalog store.
//!
//! A single write connection serves loaders and queries alike; callers are
//! expected to drive one operation at a time per store.

use super::error::CatalogError;
use super::models::*;
use super::resolver::{self, EntityKind};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use super::{analytics, ingest, reset};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a statement waits on a database locked by another process.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

/// Create the schema on an empty database, otherwise check that the existing
/// one is ours and matches the declaration.
fn initialize_schema(conn: &Connection) -> Result<()> {
    let latest_schema = CATALOG_VERSIONED_SCHEMAS
        .last()
        .context("No catalog schema declared")?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;
    if table_count == 0 {
        info!(
            "Creating catalog db schema at version {}",
            latest_schema.version
        );
        return latest_schema.create(conn);
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    let expected_version = (BASE_DB_VERSION + latest_schema.version) as i64;
    if db_version != expected_version {
        return Err(CatalogError::SchemaMismatch(format!(
            "database version {} is not the expected {}",
            db_version, expected_version
        ))
        .into());
    }

    latest_schema
        .validate(conn)
        .map_err(|e| CatalogError::SchemaMismatch(e.to_string()))?;
    Ok(())
}

impl SqliteCatalogStore {
    /// Open the catalog database at `db_path`, creating it when missing.
    pub fn open<P: AsRef<Path>>(db_path: P, options: &StoreOptions) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open catalog database {:?}", db_path))?;
        let store = Self::from_connection(conn, options)?;

        let counts = store.counts()?;
        info!(
            "Opened catalog {:?}: {} artists, {} albums, {} songs, {} listeners, {} ratings",
            db_path, counts.artists, counts.albums, counts.songs, counts.users, counts.ratings
        );
        Ok(store)
    }

    /// A private in-memory catalog, gone when the store is dropped.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, &StoreOptions::default())
    }

    fn from_connection(conn: Connection, options: &StoreOptions) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(options.busy_timeout)?;
        initialize_schema(&conn)?;
        Ok(SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // Transactions roll back while unwinding, so a poisoned connection is
        // still consistent.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn resolve(&self, kind: EntityKind, name: &str) -> Result<i64> {
        resolver::resolve(&self.lock(), kind, name)
    }

    fn load_singles(&self, singles: &[SingleSong]) -> Result<BTreeSet<SongKey>> {
        ingest::load_singles(&mut self.lock(), singles)
    }

    fn load_albums(&self, albums: &[AlbumRelease]) -> Result<BTreeSet<AlbumKey>> {
        ingest::load_albums(&mut self.lock(), albums)
    }

    fn load_users(&self, usernames: &[String]) -> Result<BTreeSet<String>> {
        ingest::load_users(&self.lock(), usernames)
    }

    fn load_ratings(&self, ratings: &[SongRating]) -> Result<BTreeSet<RatingKey>> {
        ingest::load_ratings(&self.lock(), ratings)
    }

    fn load_ratings_detailed(&self, ratings: &[SongRating]) -> Result<Vec<RejectedRating>> {
        ingest::load_ratings_detailed(&self.lock(), ratings)
    }

    fn most_prolific_individual_artists(
        &self,
        n: usize,
        years: YearRange,
    ) -> Result<Vec<ArtistSingles>> {
        analytics::most_prolific_individual_artists(&self.lock(), n, years)
    }

    fn artists_last_single_in_year(&self, year: i32) -> Result<BTreeSet<String>> {
        analytics::artists_last_single_in_year(&self.lock(), year)
    }

    fn top_song_genres(&self, n: usize) -> Result<Vec<GenreSongs>> {
        analytics::top_song_genres(&self.lock(), n)
    }

    fn album_and_single_artists(&self) -> Result<BTreeSet<String>> {
        analytics::album_and_single_artists(&self.lock())
    }

    fn most_rated_songs(&self, years: YearRange, n: usize) -> Result<Vec<SongRatings>> {
        analytics::most_rated_songs(&self.lock(), years, n)
    }

    fn most_engaged_listeners(
        &self,
        years: YearRange,
        n: usize,
    ) -> Result<Vec<ListenerRatings>> {
        analytics::most_engaged_listeners(&self.lock(), years, n)
    }

    fn clear(&self) -> Result<()> {
        info!("Clearing catalog");
        reset::clear(&mut self.lock())
    }

    fn counts(&self) -> Result<CatalogCounts> {
        reset::counts(&self.lock())
    }
}
