//! Note repository — append-only notes keyed by job id.
//!
//! Notes are immutable once written: append and delete only, no update.
//! `created_at` is RFC 3339 UTC; ordering is newest-first.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use super::{Database, DatabaseError};

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: String,
    pub job_id: String,
    pub text: String,
    pub created_at: String,
    pub created_by: String,
}

impl NoteRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            job_id: row.get("job_id")?,
            text: row.get("note_text")?,
            created_at: row.get("created_at")?,
            created_by: row.get("created_by")?,
        })
    }
}

/// Appends a note and returns its generated id.
pub fn append(
    db: &Database,
    job_id: &str,
    text: &str,
    author: &str,
) -> Result<String, DatabaseError> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339();

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO notes (id, job_id, note_text, created_at, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, job_id, text, created_at, author],
        )?;
        Ok(())
    })?;

    log::debug!("Appended note {} for job {}", id, job_id);
    Ok(id)
}

/// All notes for a job, newest first.
pub fn list_for(db: &Database, job_id: &str) -> Result<Vec<NoteRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, job_id, note_text, created_at, created_by
             FROM notes WHERE job_id = ?1
             ORDER BY created_at DESC, id",
        )?;
        let rows = stmt
            .query_map(params![job_id], NoteRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Every note in the store, newest first.
pub fn list_all(db: &Database) -> Result<Vec<NoteRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, job_id, note_text, created_at, created_by
             FROM notes ORDER BY created_at DESC, id",
        )?;
        let rows = stmt
            .query_map([], NoteRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Note count for one job.
pub fn count_for(db: &Database, job_id: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE job_id = ?1",
            params![job_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Note counts for every job that has at least one note. Used by the
/// pipeline to merge note presence into the snapshot in one query.
pub fn counts_by_job(db: &Database) -> Result<HashMap<String, u64>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT job_id, COUNT(*) FROM notes GROUP BY job_id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?)))?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(rows)
    })
}

/// Deletes a note by id. Returns true when a row was removed.
pub fn delete(db: &Database, note_id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM notes WHERE id = ?1", params![note_id])?;
        Ok(changed > 0)
    })
}
