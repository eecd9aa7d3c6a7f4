//! SQLite schema definitions for the music catalog database.
//!
//! Primary keys are integer rowids. Every natural key (artist name, genre
//! name, username, song title per artist, album name per artist, one rating
//! per listener and song) carries a unique constraint, so concurrent loaders
//! racing on the same key hit a constraint error instead of creating a
//! duplicate row.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Named Entities
// =============================================================================

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

/// Listeners.
const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

// =============================================================================
// Releases
// =============================================================================

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genres",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("release_date", &SqlType::Text, non_null = true), // 'YYYY-MM-DD'
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GENRE_FK)
        ),
    ],
    indices: &[
        ("idx_albums_artist", "artist_id"),
        ("idx_albums_genre", "genre_id"),
    ],
    unique_constraints: &[&["name", "artist_id"]],
};

/// Songs. A NULL album_id marks a single.
const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!(
            "album_id",
            &SqlType::Integer,
            foreign_key = Some(&ForeignKey {
                foreign_table: "albums",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Restrict,
            })
        ),
        sqlite_column!("release_date", &SqlType::Text, non_null = true), // 'YYYY-MM-DD'
    ],
    indices: &[
        ("idx_songs_artist", "artist_id"),
        ("idx_songs_album", "album_id"),
    ],
    unique_constraints: &[&["title", "artist_id"]],
};

// =============================================================================
// Links and Ratings
// =============================================================================

const SONG_GENRES_TABLE: Table = Table {
    name: "song_genres",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            is_primary_key = true,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "songs",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            is_primary_key = true,
            non_null = true,
            foreign_key = Some(&GENRE_FK)
        ),
    ],
    indices: &[("idx_song_genres_genre", "genre_id")],
    unique_constraints: &[],
};

const RATINGS_TABLE: Table = Table {
    name: "ratings",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "users",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Restrict,
            })
        ),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "songs",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Restrict,
            })
        ),
        sqlite_column!("rating", &SqlType::Integer, non_null = true), // 1..=5
        sqlite_column!("rating_date", &SqlType::Text, non_null = true), // 'YYYY-MM-DD'
    ],
    indices: &[("idx_ratings_song", "song_id")],
    unique_constraints: &[&["user_id", "song_id"]],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

/// Catalog schema. Parents are listed before children so creation order
/// satisfies the foreign keys.
pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        GENRES_TABLE,
        USERS_TABLE,
        ALBUMS_TABLE,
        SONGS_TABLE,
        SONG_GENRES_TABLE,
        RATINGS_TABLE,
    ],
}];
