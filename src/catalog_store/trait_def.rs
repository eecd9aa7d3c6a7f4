//! CatalogStore trait definition.
//!
//! Loaders report rejected entries as data: a returned set lists the entries
//! that were not applied. An `Err` is a fatal failure; entries before it are
//! committed and entries after it were not processed.

use super::models::*;
use super::resolver::EntityKind;
use anyhow::Result;
use std::collections::BTreeSet;

pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Id of the named artist, genre or listener, created when absent.
    fn resolve(&self, kind: EntityKind, name: &str) -> Result<i64>;

    /// Add singles. Rejects a (title, artist) that already exists.
    fn load_singles(&self, singles: &[SingleSong]) -> Result<BTreeSet<SongKey>>;

    /// Add albums and their songs. Rejects an (album, artist) that already
    /// exists.
    fn load_albums(&self, albums: &[AlbumRelease]) -> Result<BTreeSet<AlbumKey>>;

    /// Add listeners. Rejects usernames that already exist.
    fn load_users(&self, usernames: &[String]) -> Result<BTreeSet<String>>;

    /// Add ratings. Rejects invalid scores, unknown listeners, unknown songs
    /// and repeated (listener, song) ratings, without telling which.
    fn load_ratings(&self, ratings: &[SongRating]) -> Result<BTreeSet<RatingKey>>;

    /// Same as [`CatalogStore::load_ratings`], with the reason of each
    /// rejection, in input order.
    fn load_ratings_detailed(&self, ratings: &[SongRating]) -> Result<Vec<RejectedRating>>;

    // =========================================================================
    // Analytics
    // =========================================================================

    fn most_prolific_individual_artists(
        &self,
        n: usize,
        years: YearRange,
    ) -> Result<Vec<ArtistSingles>>;

    fn artists_last_single_in_year(&self, year: i32) -> Result<BTreeSet<String>>;

    fn top_song_genres(&self, n: usize) -> Result<Vec<GenreSongs>>;

    fn album_and_single_artists(&self) -> Result<BTreeSet<String>>;

    fn most_rated_songs(&self, years: YearRange, n: usize) -> Result<Vec<SongRatings>>;

    fn most_engaged_listeners(&self, years: YearRange, n: usize)
        -> Result<Vec<ListenerRatings>>;

    // =========================================================================
    // Administration
    // =========================================================================

    /// Delete all catalog data.
    fn clear(&self) -> Result<()>;

    fn counts(&self) -> Result<CatalogCounts>;
}
