//! Natural key to row id resolution for the named entities.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

/// Entities identified by a unique name and created on first reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Artist,
    Genre,
    Listener,
}

impl EntityKind {
    fn table(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artists",
            EntityKind::Genre => "genres",
            EntityKind::Listener => "users",
        }
    }
}

/// True when the statement failed on a UNIQUE or PRIMARY KEY constraint.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

pub fn find(conn: &Connection, kind: EntityKind, name: &str) -> Result<Option<i64>> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT id FROM {} WHERE name = ?1", kind.table()))?;
    let id = stmt
        .query_row(params![name], |r| r.get(0))
        .optional()
        .with_context(|| format!("Failed to look up {:?} '{}'", kind, name))?;
    Ok(id)
}

/// Insert a new row, surfacing the raw error so callers can tell a
/// uniqueness hit apart from a real failure.
pub fn create(conn: &Connection, kind: EntityKind, name: &str) -> rusqlite::Result<i64> {
    conn.execute(
        &format!("INSERT INTO {} (name) VALUES (?1)", kind.table()),
        params![name],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert the named entity, returning the existing row instead when another
/// writer created the same name first.
pub fn create_or_find(conn: &Connection, kind: EntityKind, name: &str) -> Result<i64> {
    match create(conn, kind, name) {
        Ok(id) => Ok(id),
        Err(e) if is_unique_violation(&e) => {
            warn!("{:?} '{}' was created concurrently, reusing it", kind, name);
            find(conn, kind, name)?
                .with_context(|| format!("{:?} '{}' vanished after a unique violation", kind, name))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to create {:?} '{}'", kind, name)),
    }
}

/// Return the id of the named entity, creating it when absent.
pub fn resolve(conn: &Connection, kind: EntityKind, name: &str) -> Result<i64> {
    if let Some(id) = find(conn, kind, name)? {
        return Ok(id);
    }
    create_or_find(conn, kind, name)
}
