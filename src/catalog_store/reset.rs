//! Whole-catalog reset and row counts.

use super::models::CatalogCounts;
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Deletion order. Every table comes before the tables it references, so the
/// RESTRICT foreign keys never fire.
pub const CLEAR_ORDER: [&str; 7] = [
    "ratings",
    "song_genres",
    "songs",
    "albums",
    "users",
    "genres",
    "artists",
];

/// Delete every row of every catalog table in one transaction.
pub fn clear(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    for table in CLEAR_ORDER {
        let deleted = tx
            .execute(&format!("DELETE FROM {}", table), [])
            .with_context(|| format!("Failed to clear table {}", table))?;
        info!("Cleared {} rows from {}", deleted, table);
    }
    tx.commit().context("Failed to commit catalog reset")?;
    Ok(())
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .with_context(|| format!("Failed to count rows of {}", table))?;
    Ok(count as usize)
}

pub fn counts(conn: &Connection) -> Result<CatalogCounts> {
    Ok(CatalogCounts {
        artists: count_rows(conn, "artists")?,
        genres: count_rows(conn, "genres")?,
        albums: count_rows(conn, "albums")?,
        songs: count_rows(conn, "songs")?,
        users: count_rows(conn, "users")?,
        ratings: count_rows(conn, "ratings")?,
    })
}
