//! Ranking queries over the catalog and its ratings.
//!
//! Every query is read-only and returns an empty collection on an empty
//! catalog. Rankings order by count descending, then by name ascending
//! (SQLite BINARY collation, i.e. byte-wise), and never return more than the
//! requested number of rows.

use super::models::*;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

fn sql_limit(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Top `n` artists by number of singles released within `years`.
pub fn most_prolific_individual_artists(
    conn: &Connection,
    n: usize,
    years: YearRange,
) -> Result<Vec<ArtistSingles>> {
    let mut stmt = conn.prepare_cached(
        "SELECT a.name, COUNT(*) AS num_singles
         FROM songs s
         JOIN artists a ON s.artist_id = a.id
         WHERE s.album_id IS NULL
           AND CAST(strftime('%Y', s.release_date) AS INTEGER) BETWEEN ?1 AND ?2
         GROUP BY a.id, a.name
         ORDER BY num_singles DESC, a.name ASC
         LIMIT ?3",
    )?;
    let rows = stmt
        .query_map(params![years.from, years.to, sql_limit(n)], |r| {
            Ok(ArtistSingles {
                artist: r.get(0)?,
                singles: r.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Artists with at least one single in `year` and none in a later year.
pub fn artists_last_single_in_year(conn: &Connection, year: i32) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT a.name
         FROM songs s
         JOIN artists a ON s.artist_id = a.id
         WHERE s.album_id IS NULL
         GROUP BY a.id, a.name
         HAVING MAX(CAST(strftime('%Y', s.release_date) AS INTEGER)) = ?1",
    )?;
    let names = stmt
        .query_map(params![year], |r| r.get(0))?
        .collect::<rusqlite::Result<BTreeSet<String>>>()?;
    Ok(names)
}

/// Top `n` genres by number of distinct songs, singles and album songs alike.
pub fn top_song_genres(conn: &Connection, n: usize) -> Result<Vec<GenreSongs>> {
    let mut stmt = conn.prepare_cached(
        "SELECT g.name, COUNT(DISTINCT sg.song_id) AS num_songs
         FROM genres g
         JOIN song_genres sg ON g.id = sg.genre_id
         GROUP BY g.id, g.name
         ORDER BY num_songs DESC, g.name ASC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(params![sql_limit(n)], |r| {
            Ok(GenreSongs {
                genre: r.get(0)?,
                songs: r.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Artists with at least one single and at least one album song.
pub fn album_and_single_artists(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT a.name
         FROM songs s
         JOIN artists a ON s.artist_id = a.id
         GROUP BY a.id, a.name
         HAVING SUM(s.album_id IS NULL) > 0 AND SUM(s.album_id IS NOT NULL) > 0",
    )?;
    let names = stmt
        .query_map([], |r| r.get(0))?
        .collect::<rusqlite::Result<BTreeSet<String>>>()?;
    Ok(names)
}

/// Top `n` songs by number of ratings given within `years`.
///
/// Songs are grouped by identity, so two artists' songs sharing a title are
/// counted separately. Equal counts order by title, then artist name.
pub fn most_rated_songs(
    conn: &Connection,
    years: YearRange,
    n: usize,
) -> Result<Vec<SongRatings>> {
    let mut stmt = conn.prepare_cached(
        "SELECT s.title, a.name, COUNT(*) AS num_ratings
         FROM ratings r
         JOIN songs s ON r.song_id = s.id
         JOIN artists a ON s.artist_id = a.id
         WHERE CAST(strftime('%Y', r.rating_date) AS INTEGER) BETWEEN ?1 AND ?2
         GROUP BY s.id, s.title, a.name
         ORDER BY num_ratings DESC, s.title ASC, a.name ASC
         LIMIT ?3",
    )?;
    let rows = stmt
        .query_map(params![years.from, years.to, sql_limit(n)], |r| {
            Ok(SongRatings {
                title: r.get(0)?,
                artist: r.get(1)?,
                ratings: r.get::<_, i64>(2)? as u64,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Top `n` listeners by number of ratings given within `years`.
pub fn most_engaged_listeners(
    conn: &Connection,
    years: YearRange,
    n: usize,
) -> Result<Vec<ListenerRatings>> {
    let mut stmt = conn.prepare_cached(
        "SELECT u.name, COUNT(*) AS num_ratings
         FROM ratings r
         JOIN users u ON r.user_id = u.id
         WHERE CAST(strftime('%Y', r.rating_date) AS INTEGER) BETWEEN ?1 AND ?2
         GROUP BY u.id, u.name
         ORDER BY num_ratings DESC, u.name ASC
         LIMIT ?3",
    )?;
    let rows = stmt
        .query_map(params![years.from, years.to, sql_limit(n)], |r| {
            Ok(ListenerRatings {
                username: r.get(0)?,
                ratings: r.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
