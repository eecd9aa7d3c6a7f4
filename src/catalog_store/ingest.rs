//! Batch loaders for singles, albums, listeners and ratings.
//!
//! Every entry is its own unit of work: accepted entries are committed one by
//! one, rejected entries are collected and the batch moves on. A fatal error
//! rolls back the entry being processed and aborts the batch, leaving the
//! entries before it committed and the ones after it untouched.

use super::error::CatalogError;
use super::models::*;
use super::resolver::{self, is_unique_violation, EntityKind};
use super::validation::{distinct_names, format_date, parse_date, validate_score};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

// =========================================================================
// Row Helpers
// =========================================================================

/// Find a song by artist name and title.
fn find_song(conn: &Connection, artist: &str, title: &str) -> Result<Option<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT s.id FROM songs s
         JOIN artists a ON s.artist_id = a.id
         WHERE s.title = ?1 AND a.name = ?2",
    )?;
    let id = stmt
        .query_row(params![title, artist], |r| r.get(0))
        .optional()?;
    Ok(id)
}

fn find_album(conn: &Connection, name: &str, artist_id: i64) -> Result<Option<i64>> {
    let mut stmt =
        conn.prepare_cached("SELECT id FROM albums WHERE name = ?1 AND artist_id = ?2")?;
    let id = stmt
        .query_row(params![name, artist_id], |r| r.get(0))
        .optional()?;
    Ok(id)
}

fn rating_exists(conn: &Connection, user_id: i64, song_id: i64) -> Result<bool> {
    let mut stmt =
        conn.prepare_cached("SELECT 1 FROM ratings WHERE user_id = ?1 AND song_id = ?2")?;
    Ok(stmt
        .query_row(params![user_id, song_id], |_| Ok(()))
        .optional()?
        .is_some())
}

fn insert_song(
    conn: &Connection,
    title: &str,
    artist_id: i64,
    album_id: Option<i64>,
    release_date: &str,
) -> rusqlite::Result<i64> {
    conn.prepare_cached(
        "INSERT INTO songs (title, artist_id, album_id, release_date) VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![title, artist_id, album_id, release_date])?;
    Ok(conn.last_insert_rowid())
}

fn insert_album(
    conn: &Connection,
    name: &str,
    artist_id: i64,
    release_date: &str,
    genre_id: i64,
) -> rusqlite::Result<i64> {
    conn.prepare_cached(
        "INSERT INTO albums (name, artist_id, release_date, genre_id) VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![name, artist_id, release_date, genre_id])?;
    Ok(conn.last_insert_rowid())
}

fn link_song_genre(conn: &Connection, song_id: i64, genre_id: i64) -> Result<()> {
    conn.prepare_cached("INSERT INTO song_genres (song_id, genre_id) VALUES (?1, ?2)")?
        .execute(params![song_id, genre_id])
        .with_context(|| format!("Failed to link song {} to genre {}", song_id, genre_id))?;
    Ok(())
}

// =========================================================================
// Entry Writers
// =========================================================================
//
// Writers run once the caller found the natural key free. A `None` or
// `false` result means another writer took the key after that lookup.

/// Insert a single and its artist, returning the new song id.
fn store_single(
    conn: &Connection,
    single: &SingleSong,
    release_date: &str,
) -> Result<Option<i64>> {
    let artist_id = resolver::resolve(conn, EntityKind::Artist, &single.artist)?;
    match insert_song(conn, &single.title, artist_id, None, release_date) {
        Ok(id) => Ok(Some(id)),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e).with_context(|| {
            format!(
                "Failed to insert single '{}' by '{}'",
                single.title, single.artist
            )
        }),
    }
}

/// Insert an album row and its genre, returning `(album_id, genre_id)`.
fn store_album(
    conn: &Connection,
    album: &AlbumRelease,
    artist_id: i64,
    release_date: &str,
) -> Result<Option<(i64, i64)>> {
    let genre_id = resolver::resolve(conn, EntityKind::Genre, &album.genre)?;
    match insert_album(conn, &album.name, artist_id, release_date, genre_id) {
        Ok(id) => Ok(Some((id, genre_id))),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e).with_context(|| {
            format!(
                "Failed to insert album '{}' by '{}'",
                album.name, album.artist
            )
        }),
    }
}

fn store_listener(conn: &Connection, username: &str) -> Result<bool> {
    match resolver::create(conn, EntityKind::Listener, username) {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to insert listener '{}'", username)),
    }
}

fn store_rating(
    conn: &Connection,
    user_id: i64,
    song_id: i64,
    score: i64,
    rating_date: &str,
) -> Result<bool> {
    let inserted = conn
        .prepare_cached(
            "INSERT INTO ratings (user_id, song_id, rating, rating_date)
             VALUES (?1, ?2, ?3, ?4)",
        )?
        .execute(params![user_id, song_id, score, rating_date]);
    match inserted {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// =========================================================================
// Singles
// =========================================================================

/// Load singles, returning the (title, artist) pairs that already existed.
///
/// The release date is only read for entries that pass the duplicate check.
pub fn load_singles(conn: &mut Connection, singles: &[SingleSong]) -> Result<BTreeSet<SongKey>> {
    let mut rejected = BTreeSet::new();
    let mut accepted = 0usize;

    for single in singles {
        let key = SongKey::new(&single.title, &single.artist);

        let tx = conn.transaction()?;
        if find_song(&tx, &single.artist, &single.title)?.is_some() {
            debug!("Rejected single {:?}: already exists", key);
            rejected.insert(key);
            continue;
        }

        let release_date = format_date(parse_date(&single.release_date)?);
        let Some(song_id) = store_single(&tx, single, &release_date)? else {
            warn!("Single {:?} was created concurrently, rejecting", key);
            rejected.insert(key);
            continue;
        };

        for genre in distinct_names(&single.genres) {
            let genre_id = resolver::resolve(&tx, EntityKind::Genre, genre)?;
            link_song_genre(&tx, song_id, genre_id)?;
        }
        tx.commit()
            .with_context(|| format!("Failed to commit single {:?}", key))?;
        accepted += 1;
    }

    info!(
        "Loaded singles: {} accepted, {} rejected",
        accepted,
        singles.len() - accepted
    );
    Ok(rejected)
}

// =========================================================================
// Albums
// =========================================================================

/// Load albums, returning the (album, artist) pairs that already existed.
///
/// The artist is resolved before the duplicate check and stays created even
/// when the album is rejected.
pub fn load_albums(conn: &mut Connection, albums: &[AlbumRelease]) -> Result<BTreeSet<AlbumKey>> {
    let mut rejected = BTreeSet::new();
    let mut accepted = 0usize;

    for album in albums {
        let key = AlbumKey::new(&album.name, &album.artist);

        let tx = conn.transaction()?;
        let artist_id = resolver::resolve(&tx, EntityKind::Artist, &album.artist)?;
        if find_album(&tx, &album.name, artist_id)?.is_some() {
            debug!("Rejected album {:?}: already exists", key);
            tx.commit()?;
            rejected.insert(key);
            continue;
        }

        let release_date = format_date(parse_date(&album.release_date)?);
        let Some((album_id, genre_id)) = store_album(&tx, album, artist_id, &release_date)? else {
            // The competing album already references the artist, so dropping
            // the transaction only discards the genre resolved here.
            warn!("Album {:?} was created concurrently, rejecting", key);
            rejected.insert(key);
            continue;
        };

        for title in &album.songs {
            let song_id = insert_song(&tx, title, artist_id, Some(album_id), &release_date)
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        anyhow::Error::new(CatalogError::SongConflict {
                            title: title.clone(),
                            artist: album.artist.clone(),
                        })
                    } else {
                        anyhow::Error::new(e)
                    }
                })
                .with_context(|| format!("Failed to insert songs of album {:?}", key))?;
            link_song_genre(&tx, song_id, genre_id)?;
        }
        tx.commit()
            .with_context(|| format!("Failed to commit album {:?}", key))?;
        accepted += 1;
    }

    info!(
        "Loaded albums: {} accepted, {} rejected",
        accepted,
        albums.len() - accepted
    );
    Ok(rejected)
}

// =========================================================================
// Listeners
// =========================================================================

/// Load listeners in input order, returning the usernames that already
/// existed, including repeats within the same batch.
pub fn load_users(conn: &Connection, usernames: &[String]) -> Result<BTreeSet<String>> {
    let mut rejected = BTreeSet::new();
    let mut accepted = 0usize;

    for username in usernames {
        if resolver::find(conn, EntityKind::Listener, username)?.is_some() {
            debug!("Rejected listener '{}': already exists", username);
            rejected.insert(username.clone());
            continue;
        }
        if store_listener(conn, username)? {
            accepted += 1;
        } else {
            warn!("Listener '{}' was created concurrently, rejecting", username);
            rejected.insert(username.clone());
        }
    }

    info!(
        "Loaded listeners: {} accepted, {} rejected",
        accepted,
        usernames.len() - accepted
    );
    Ok(rejected)
}

// =========================================================================
// Ratings
// =========================================================================

enum RatingVerdict {
    Accepted { user_id: i64, song_id: i64 },
    Rejected(RatingRejection),
}

/// Run the checks in order, stopping at the first failure.
fn judge_rating(conn: &Connection, rating: &SongRating) -> Result<RatingVerdict> {
    if let Err(reason) = validate_score(rating.score) {
        return Ok(RatingVerdict::Rejected(reason));
    }
    let Some(user_id) = resolver::find(conn, EntityKind::Listener, &rating.username)? else {
        return Ok(RatingVerdict::Rejected(RatingRejection::UnknownListener));
    };
    let Some(song_id) = find_song(conn, &rating.song.artist, &rating.song.title)? else {
        return Ok(RatingVerdict::Rejected(RatingRejection::UnknownSong));
    };
    if rating_exists(conn, user_id, song_id)? {
        return Ok(RatingVerdict::Rejected(RatingRejection::DuplicateRating));
    }
    Ok(RatingVerdict::Accepted { user_id, song_id })
}

/// Load ratings, reporting every rejection with the check that fired, in
/// input order. The date of a rejected rating is never read.
pub fn load_ratings_detailed(
    conn: &Connection,
    ratings: &[SongRating],
) -> Result<Vec<RejectedRating>> {
    let mut rejected = Vec::new();

    for rating in ratings {
        let key = RatingKey::from(rating);

        let reason = match judge_rating(conn, rating)? {
            RatingVerdict::Rejected(reason) => reason,
            RatingVerdict::Accepted { user_id, song_id } => {
                let rating_date = format_date(parse_date(&rating.date)?);
                if store_rating(conn, user_id, song_id, rating.score, &rating_date)
                    .with_context(|| format!("Failed to insert rating {:?}", key))?
                {
                    continue;
                }
                warn!("Rating {:?} was created concurrently, rejecting", key);
                RatingRejection::DuplicateRating
            }
        };

        debug!("Rejected rating {:?}: {}", key, reason);
        rejected.push(RejectedRating { key, reason });
    }

    info!(
        "Loaded ratings: {} accepted, {} rejected",
        ratings.len() - rejected.len(),
        rejected.len()
    );
    Ok(rejected)
}

/// Load ratings, returning the (username, artist, title) of every rejected
/// entry without saying why it was rejected.
pub fn load_ratings(conn: &Connection, ratings: &[SongRating]) -> Result<BTreeSet<RatingKey>> {
    Ok(load_ratings_detailed(conn, ratings)?
        .into_iter()
        .map(|r| r.key)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::reset::counts;
    use crate::catalog_store::schema::CATALOG_VERSIONED_SCHEMAS;

    fn create_catalog_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();
        conn
    }

    fn usernames(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn genre_links(conn: &Connection, title: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(
                "SELECT g.name FROM song_genres sg
                 JOIN songs s ON sg.song_id = s.id
                 JOIN genres g ON sg.genre_id = g.id
                 WHERE s.title = ?1 ORDER BY g.name",
            )
            .unwrap();
        let names = stmt
            .query_map(params![title], |r| r.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap();
        names
    }

    #[test]
    fn singles_are_rejected_on_second_load() {
        let mut conn = create_catalog_db();
        let singles = vec![SingleSong::new("S1", &["Pop"], "A1", "2008-01-10")];

        assert!(load_singles(&mut conn, &singles).unwrap().is_empty());
        let rejected = load_singles(&mut conn, &singles).unwrap();

        assert_eq!(rejected, BTreeSet::from([SongKey::new("S1", "A1")]));
        assert_eq!(counts(&conn).unwrap().songs, 1);
    }

    #[test]
    fn same_title_for_another_artist_is_accepted() {
        let mut conn = create_catalog_db();
        let singles = vec![
            SingleSong::new("S1", &["Pop"], "A1", "2008-01-10"),
            SingleSong::new("S1", &["Rock"], "A2", "2009-01-10"),
        ];

        assert!(load_singles(&mut conn, &singles).unwrap().is_empty());
        assert_eq!(counts(&conn).unwrap().songs, 2);
    }

    #[test]
    fn repeated_genres_link_once() {
        let mut conn = create_catalog_db();
        let singles = vec![SingleSong::new(
            "S1",
            &["Rock", "Pop", "Rock"],
            "A1",
            "2000-02-15",
        )];

        assert!(load_singles(&mut conn, &singles).unwrap().is_empty());
        assert_eq!(genre_links(&conn, "S1"), vec!["Pop", "Rock"]);
        assert_eq!(counts(&conn).unwrap().genres, 2);
    }

    #[test]
    fn in_batch_duplicate_single_is_rejected() {
        let mut conn = create_catalog_db();
        let singles = vec![
            SingleSong::new("S1", &["Pop"], "A1", "2008-01-10"),
            SingleSong::new("S1", &["Jazz"], "A1", "2010-01-10"),
        ];

        let rejected = load_singles(&mut conn, &singles).unwrap();

        assert_eq!(rejected, BTreeSet::from([SongKey::new("S1", "A1")]));
        assert_eq!(genre_links(&conn, "S1"), vec!["Pop"]);
        // The rejected entry left no genre behind.
        assert_eq!(counts(&conn).unwrap().genres, 1);
    }

    #[test]
    fn malformed_date_aborts_after_committing_earlier_entries() {
        let mut conn = create_catalog_db();
        let singles = vec![
            SingleSong::new("S1", &["Pop"], "A1", "2008-01-10"),
            SingleSong::new("S2", &["Pop"], "A1", "not a date"),
            SingleSong::new("S3", &["Pop"], "A1", "2008-03-10"),
        ];

        let err = load_singles(&mut conn, &singles).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::InvalidDate { .. })
        ));
        assert_eq!(counts(&conn).unwrap().songs, 1);
    }

    #[test]
    fn album_songs_inherit_album_genre_and_date() {
        let mut conn = create_catalog_db();
        let albums = vec![AlbumRelease::new(
            "Album1",
            "Jazz",
            "A1",
            "2008-10-01",
            &["s1", "s2", "s3"],
        )];

        assert!(load_albums(&mut conn, &albums).unwrap().is_empty());

        let counts = counts(&conn).unwrap();
        assert_eq!(counts.albums, 1);
        assert_eq!(counts.songs, 3);
        for title in ["s1", "s2", "s3"] {
            assert_eq!(genre_links(&conn, title), vec!["Jazz"]);
        }
        let (album_songs, dates): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), COUNT(DISTINCT release_date) FROM songs
                 WHERE album_id IS NOT NULL AND release_date = '2008-10-01'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!((album_songs, dates), (3, 1));
    }

    #[test]
    fn rejected_album_keeps_new_artist() {
        let mut conn = create_catalog_db();
        load_albums(
            &mut conn,
            &[AlbumRelease::new("25", "Pop", "Adele", "2015-11-20", &["Hello"])],
        )
        .unwrap();

        let rejected = load_albums(
            &mut conn,
            &[
                AlbumRelease::new("25", "Soul", "Adele", "2016-01-01", &["Other"]),
                AlbumRelease::new("25", "Pop", "Someone Else", "2015-11-20", &["Hello"]),
            ],
        )
        .unwrap();

        assert_eq!(rejected, BTreeSet::from([AlbumKey::new("25", "Adele")]));
        let counts = counts(&conn).unwrap();
        assert_eq!(counts.albums, 2);
        assert_eq!(counts.artists, 2);
        // The rejected album's genre was never resolved.
        assert_eq!(counts.genres, 1);
    }

    #[test]
    fn album_song_colliding_with_single_is_fatal() {
        let mut conn = create_catalog_db();
        load_singles(
            &mut conn,
            &[SingleSong::new("Hello", &["Pop"], "Adele", "2015-10-23")],
        )
        .unwrap();

        let err = load_albums(
            &mut conn,
            &[AlbumRelease::new(
                "25",
                "Pop",
                "Adele",
                "2015-11-20",
                &["Hello", "Send My Love"],
            )],
        )
        .unwrap_err();

        match err.downcast_ref::<CatalogError>() {
            Some(CatalogError::SongConflict { title, artist }) => {
                assert_eq!(title, "Hello");
                assert_eq!(artist, "Adele");
            }
            other => panic!("expected SongConflict, got {:?}", other),
        }
        let counts = counts(&conn).unwrap();
        assert_eq!(counts.albums, 0);
        assert_eq!(counts.songs, 1);
    }

    #[test]
    fn users_are_deduplicated_in_input_order() {
        let conn = create_catalog_db();

        let rejected = load_users(&conn, &usernames(&["alice", "bob", "alice"])).unwrap();
        assert_eq!(rejected, BTreeSet::from(["alice".to_string()]));

        let rejected = load_users(&conn, &usernames(&["bob", "carol"])).unwrap();
        assert_eq!(rejected, BTreeSet::from(["bob".to_string()]));
        assert_eq!(counts(&conn).unwrap().users, 3);
    }

    fn seed_for_ratings(conn: &mut Connection) {
        load_singles(conn, &[SingleSong::new("s1", &["Pop"], "a1", "2020-01-01")]).unwrap();
        load_users(conn, &usernames(&["u1"])).unwrap();
    }

    #[test]
    fn rating_pipeline_reports_first_failing_check() {
        let mut conn = create_catalog_db();
        seed_for_ratings(&mut conn);

        let ratings = vec![
            SongRating::new("ghost", "a1", "s1", 9, "2021-01-01"),
            SongRating::new("ghost", "a1", "s1", 3, "2021-01-01"),
            SongRating::new("u1", "a1", "missing", 3, "2021-01-01"),
            SongRating::new("u1", "a2", "s1", 3, "2021-01-01"),
            SongRating::new("u1", "a1", "s1", 4, "2021-01-01"),
            SongRating::new("u1", "a1", "s1", 5, "2021-06-01"),
        ];

        let rejected = load_ratings_detailed(&conn, &ratings).unwrap();
        let reasons: Vec<RatingRejection> = rejected.iter().map(|r| r.reason).collect();

        assert_eq!(
            reasons,
            vec![
                RatingRejection::InvalidScore,
                RatingRejection::UnknownListener,
                RatingRejection::UnknownSong,
                RatingRejection::UnknownSong,
                RatingRejection::DuplicateRating,
            ]
        );
        assert_eq!(rejected[4].key, RatingKey::new("u1", "a1", "s1"));
        assert_eq!(counts(&conn).unwrap().ratings, 1);
    }

    #[test]
    fn out_of_range_score_is_rejected_for_valid_listener_and_song() {
        let mut conn = create_catalog_db();
        seed_for_ratings(&mut conn);

        let rejected = load_ratings(
            &conn,
            &[
                SongRating::new("u1", "a1", "s1", 6, "2021-01-01"),
                SongRating::new("u1", "a1", "s1", 0, "2021-01-01"),
            ],
        )
        .unwrap();

        assert_eq!(rejected, BTreeSet::from([RatingKey::new("u1", "a1", "s1")]));
        assert_eq!(counts(&conn).unwrap().ratings, 0);
    }

    #[test]
    fn bad_score_with_malformed_date_is_rejected() {
        let mut conn = create_catalog_db();
        seed_for_ratings(&mut conn);

        let rejected = load_ratings(
            &conn,
            &[
                SongRating::new("u1", "a1", "s1", 6, "2021/01/01"),
                SongRating::new("u1", "a1", "s1", 4, "2021-01-01"),
            ],
        )
        .unwrap();

        assert_eq!(rejected, BTreeSet::from([RatingKey::new("u1", "a1", "s1")]));
        assert_eq!(counts(&conn).unwrap().ratings, 1);
    }

    #[test]
    fn rejected_rating_dates_are_never_parsed() {
        let mut conn = create_catalog_db();
        seed_for_ratings(&mut conn);

        let rejected = load_ratings_detailed(
            &conn,
            &[
                SongRating::new("ghost", "a1", "s1", 3, "yesterday"),
                SongRating::new("u1", "a1", "missing", 3, ""),
                SongRating::new("u1", "a1", "s1", 3, "2021-01-01"),
                SongRating::new("u1", "a1", "s1", 2, "2021-13-01"),
            ],
        )
        .unwrap();

        let reasons: Vec<RatingRejection> = rejected.iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![
                RatingRejection::UnknownListener,
                RatingRejection::UnknownSong,
                RatingRejection::DuplicateRating,
            ]
        );
    }

    #[test]
    fn malformed_date_on_stored_rating_is_fatal() {
        let mut conn = create_catalog_db();
        seed_for_ratings(&mut conn);

        let err = load_ratings(&conn, &[SongRating::new("u1", "a1", "s1", 4, "2021/01/01")])
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::InvalidDate { .. })
        ));
        assert_eq!(counts(&conn).unwrap().ratings, 0);
    }

    #[test]
    fn duplicate_single_with_malformed_date_is_rejected() {
        let mut conn = create_catalog_db();
        load_singles(&mut conn, &[SingleSong::new("S1", &["Pop"], "A1", "2008-01-10")]).unwrap();

        let rejected = load_singles(
            &mut conn,
            &[
                SingleSong::new("S1", &["Pop"], "A1", "2020-13-01"),
                SingleSong::new("S2", &["Pop"], "A1", "2020-02-01"),
            ],
        )
        .unwrap();

        assert_eq!(rejected, BTreeSet::from([SongKey::new("S1", "A1")]));
        assert_eq!(counts(&conn).unwrap().songs, 2);
    }

    #[test]
    fn duplicate_album_with_malformed_date_is_rejected() {
        let mut conn = create_catalog_db();
        load_albums(
            &mut conn,
            &[AlbumRelease::new("25", "Pop", "Adele", "2015-11-20", &["Hello"])],
        )
        .unwrap();

        let rejected = load_albums(
            &mut conn,
            &[AlbumRelease::new("25", "Pop", "Adele", "20/11/2015", &["Other"])],
        )
        .unwrap();

        assert_eq!(rejected, BTreeSet::from([AlbumKey::new("25", "Adele")]));
        assert_eq!(counts(&conn).unwrap().albums, 1);
    }

    #[test]
    fn store_single_yields_to_existing_song() {
        let mut conn = create_catalog_db();
        let single = SingleSong::new("S1", &["Pop"], "A1", "2008-01-10");
        load_singles(&mut conn, std::slice::from_ref(&single)).unwrap();

        let stored = store_single(&conn, &single, "2009-01-01").unwrap();

        assert_eq!(stored, None);
        assert_eq!(counts(&conn).unwrap().songs, 1);
    }

    #[test]
    fn store_album_yields_and_leaves_no_genre_once_rolled_back() {
        let mut conn = create_catalog_db();
        load_albums(
            &mut conn,
            &[AlbumRelease::new("25", "Pop", "Adele", "2015-11-20", &["Hello"])],
        )
        .unwrap();
        let artist_id = resolver::find(&conn, EntityKind::Artist, "Adele")
            .unwrap()
            .unwrap();

        {
            let tx = conn.transaction().unwrap();
            let racing = AlbumRelease::new("25", "Grunge", "Adele", "2016-01-01", &["Other"]);
            let stored = store_album(&tx, &racing, artist_id, "2016-01-01").unwrap();
            assert_eq!(stored, None);
        }

        let counts = counts(&conn).unwrap();
        assert_eq!(counts.albums, 1);
        assert_eq!(counts.genres, 1);
    }

    #[test]
    fn store_listener_yields_to_existing_listener() {
        let conn = create_catalog_db();
        load_users(&conn, &usernames(&["u1"])).unwrap();

        assert!(!store_listener(&conn, "u1").unwrap());
        assert!(store_listener(&conn, "u2").unwrap());
        assert_eq!(counts(&conn).unwrap().users, 2);
    }

    #[test]
    fn store_rating_yields_to_existing_rating() {
        let mut conn = create_catalog_db();
        seed_for_ratings(&mut conn);
        load_ratings(&conn, &[SongRating::new("u1", "a1", "s1", 4, "2021-01-01")]).unwrap();
        let user_id = resolver::find(&conn, EntityKind::Listener, "u1")
            .unwrap()
            .unwrap();
        let song_id = find_song(&conn, "a1", "s1").unwrap().unwrap();

        assert!(!store_rating(&conn, user_id, song_id, 2, "2022-01-01").unwrap());
        assert_eq!(counts(&conn).unwrap().ratings, 1);
    }
}
