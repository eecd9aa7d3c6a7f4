//! Input entries, rejection keys and ranking rows.
//!
//! Inputs deserialize from the JSON files read by the CLI; outputs serialize
//! back so rejections and rankings can be printed as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Load Inputs
// =============================================================================

/// A song released outside of any album.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSong {
    pub title: String,
    /// A single may belong to several genres.
    pub genres: Vec<String>,
    pub artist: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub release_date: String,
}

impl SingleSong {
    pub fn new<S: Into<String>>(title: S, genres: &[&str], artist: S, release_date: S) -> Self {
        SingleSong {
            title: title.into(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            artist: artist.into(),
            release_date: release_date.into(),
        }
    }
}

/// An album and the titles of its songs. Every song inherits the album genre
/// and release date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRelease {
    pub name: String,
    pub genre: String,
    pub artist: String,
    pub release_date: String,
    pub songs: Vec<String>,
}

impl AlbumRelease {
    pub fn new<S: Into<String>>(
        name: S,
        genre: S,
        artist: S,
        release_date: S,
        songs: &[&str],
    ) -> Self {
        AlbumRelease {
            name: name.into(),
            genre: genre.into(),
            artist: artist.into(),
            release_date: release_date.into(),
            songs: songs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Natural key of a song.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRef {
    pub artist: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRating {
    pub username: String,
    pub song: SongRef,
    /// Kept wide so out-of-range scores reach validation instead of failing
    /// deserialization.
    pub score: i64,
    pub date: String,
}

impl SongRating {
    pub fn new<S: Into<String>>(username: S, artist: S, title: S, score: i64, date: S) -> Self {
        SongRating {
            username: username.into(),
            song: SongRef {
                artist: artist.into(),
                title: title.into(),
            },
            score,
            date: date.into(),
        }
    }
}

// =============================================================================
// Rejection Keys
// =============================================================================

/// A rejected single: (title, artist).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SongKey {
    pub title: String,
    pub artist: String,
}

impl SongKey {
    pub fn new(title: &str, artist: &str) -> Self {
        SongKey {
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }
}

/// A rejected album: (album name, artist).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AlbumKey {
    pub album: String,
    pub artist: String,
}

impl AlbumKey {
    pub fn new(album: &str, artist: &str) -> Self {
        AlbumKey {
            album: album.to_string(),
            artist: artist.to_string(),
        }
    }
}

/// A rejected rating: (username, artist, song title).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RatingKey {
    pub username: String,
    pub artist: String,
    pub title: String,
}

impl RatingKey {
    pub fn new(username: &str, artist: &str, title: &str) -> Self {
        RatingKey {
            username: username.to_string(),
            artist: artist.to_string(),
            title: title.to_string(),
        }
    }
}

impl From<&SongRating> for RatingKey {
    fn from(rating: &SongRating) -> Self {
        RatingKey::new(&rating.username, &rating.song.artist, &rating.song.title)
    }
}

/// Which rating check failed. The first failing check wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RatingRejection {
    InvalidScore,
    UnknownListener,
    UnknownSong,
    DuplicateRating,
}

impl fmt::Display for RatingRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingRejection::InvalidScore => write!(f, "score must be between 1 and 5"),
            RatingRejection::UnknownListener => write!(f, "listener does not exist"),
            RatingRejection::UnknownSong => write!(f, "song does not exist"),
            RatingRejection::DuplicateRating => write!(f, "listener already rated this song"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectedRating {
    pub key: RatingKey,
    pub reason: RatingRejection,
}

// =============================================================================
// Ranking Rows
// =============================================================================

/// Inclusive range of calendar years. An inverted range matches nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Self {
        YearRange { from, to }
    }
}

impl From<(i32, i32)> for YearRange {
    fn from((from, to): (i32, i32)) -> Self {
        YearRange::new(from, to)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtistSingles {
    pub artist: String,
    pub singles: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenreSongs {
    pub genre: String,
    pub songs: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SongRatings {
    pub title: String,
    pub artist: String,
    pub ratings: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListenerRatings {
    pub username: String,
    pub ratings: u64,
}

/// Row counts per table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub artists: usize,
    pub genres: usize,
    pub albums: usize,
    pub songs: usize,
    pub users: usize,
    pub ratings: usize,
}

impl CatalogCounts {
    pub fn is_empty(&self) -> bool {
        *self == CatalogCounts::default()
    }
}
