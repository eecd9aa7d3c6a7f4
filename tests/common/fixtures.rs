//! Seeded catalogs for integration tests.

use super::constants::*;
use music_catalog_store::catalog_store::{
    AlbumRelease, CatalogStore, SingleSong, SongRating, SqliteCatalogStore, StoreOptions,
};
use std::path::PathBuf;
use tempfile::TempDir;

pub fn single(title: &str, genres: &[&str], artist: &str, date: &str) -> SingleSong {
    SingleSong::new(title, genres, artist, date)
}

pub fn album(name: &str, genre: &str, artist: &str, date: &str, songs: &[&str]) -> AlbumRelease {
    AlbumRelease::new(name, genre, artist, date, songs)
}

pub fn rating(username: &str, artist: &str, title: &str, score: i64, date: &str) -> SongRating {
    SongRating::new(username, artist, title, score, date)
}

pub fn usernames(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// A catalog database in its own temporary directory.
pub struct TestCatalog {
    pub store: SqliteCatalogStore,
    pub db_path: PathBuf,
    _dir: TempDir,
}

impl TestCatalog {
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("catalog.db");
        let store = SqliteCatalogStore::open(&db_path, &StoreOptions::default()).unwrap();
        TestCatalog {
            store,
            db_path,
            _dir: dir,
        }
    }

    /// Catalog with:
    /// - A1: 3 singles in 2008-2009, last single in 2015, one album
    /// - A2, A3: 2 singles each in 2009-2010
    /// - Retired: singles in 2015 only
    /// - Album Band: one album, no singles
    /// - "Hello" released by both A1 and A2
    /// - 3 listeners and 6 ratings
    pub fn seeded() -> Self {
        let catalog = Self::empty();
        let store = &catalog.store;

        let singles = vec![
            single("Morning", &["Pop"], ARTIST_PROLIFIC, "2008-01-10"),
            single("Noon", &["Pop", "Rock"], ARTIST_PROLIFIC, "2008-06-01"),
            single(SHARED_TITLE, &["Pop"], ARTIST_PROLIFIC, "2009-03-15"),
            single("Comeback", &["Pop"], ARTIST_PROLIFIC, "2015-05-05"),
            single(SHARED_TITLE, &["Rock"], ARTIST_TIE_FIRST, "2009-07-07"),
            single("Riff", &["Rock"], ARTIST_TIE_FIRST, "2010-02-02"),
            single("Swing", &["Jazz"], ARTIST_TIE_SECOND, "2009-11-11"),
            single("Blue", &["Jazz"], ARTIST_TIE_SECOND, "2010-12-12"),
            single("Farewell", &["Folk"], ARTIST_RETIRED, "2015-09-09"),
        ];
        assert!(store.load_singles(&singles).unwrap().is_empty());

        let albums = vec![
            album("Greatest", "Pop", ARTIST_PROLIFIC, "2012-04-04", &["Intro", "Outro"]),
            album("Debut", "Metal", ARTIST_ALBUMS_ONLY, "2016-01-01", &["Loud", "Louder"]),
        ];
        assert!(store.load_albums(&albums).unwrap().is_empty());

        let listeners = usernames(&[LISTENER_1, LISTENER_2, LISTENER_3]);
        assert!(store.load_users(&listeners).unwrap().is_empty());

        let ratings = vec![
            rating(LISTENER_1, ARTIST_PROLIFIC, SHARED_TITLE, 5, "2016-01-01"),
            rating(LISTENER_2, ARTIST_PROLIFIC, SHARED_TITLE, 4, "2016-02-01"),
            rating(LISTENER_3, ARTIST_TIE_FIRST, SHARED_TITLE, 3, "2016-03-01"),
            rating(LISTENER_1, ARTIST_TIE_FIRST, SHARED_TITLE, 2, "2017-01-01"),
            rating(LISTENER_1, ARTIST_ALBUMS_ONLY, "Loud", 4, "2017-06-01"),
            rating(LISTENER_2, ARTIST_PROLIFIC, "Intro", 1, "2018-08-08"),
        ];
        assert!(store.load_ratings(&ratings).unwrap().is_empty());

        catalog
    }
}
