//! Work catalog queries
//!
//! One row per registered work. The `path` column is UNIQUE, so the
//! one-work-per-managed-path invariant is enforced here rather than in the
//! engine.

use crate::error::{Result, StorageError};
use folio_core::types::{CreateWork, Work, WorkType};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};

const WORK_COLUMNS: &str =
    "id, title, path, work_type, page_count, artist, year, genre, circle, origin, created_at";

/// Register a new work, assigning its id
///
/// # Errors
///
/// Returns `StorageError::Duplicate` if the path is already registered
pub async fn create(pool: &SqlitePool, fields: CreateWork) -> Result<Work> {
    let created_at = chrono::Utc::now();
    let path = fields.path.to_string_lossy().to_string();

    let result = sqlx::query(
        "INSERT INTO works (title, path, work_type, page_count, artist, year, genre, circle, origin, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&fields.title)
    .bind(&path)
    .bind(fields.work_type.as_str())
    .bind(i64::from(fields.page_count))
    .bind(&fields.artist)
    .bind(fields.year)
    .bind(&fields.genre)
    .bind(&fields.circle)
    .bind(&fields.origin)
    .bind(created_at.timestamp())
    .execute(pool)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            StorageError::Duplicate(path.clone())
        } else {
            StorageError::Database(e)
        }
    })?;

    Ok(Work {
        id: result.last_insert_rowid(),
        title: fields.title,
        path: fields.path,
        work_type: fields.work_type,
        page_count: fields.page_count,
        created_at,
        artist: fields.artist,
        year: fields.year,
        genre: fields.genre,
        circle: fields.circle,
        origin: fields.origin,
    })
}

/// Get a work by id
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Work>> {
    let row = sqlx::query(&format!("SELECT {WORK_COLUMNS} FROM works WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_work).transpose()
}

/// List all registered works, ordered by id for a stable iteration
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Work>> {
    let rows = sqlx::query(&format!("SELECT {WORK_COLUMNS} FROM works ORDER BY id"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_work).collect()
}

/// Update the managed path of a work
///
/// Returns `Ok(false)` if no work has this id.
///
/// # Errors
///
/// Returns `StorageError::Duplicate` if another work already holds the path
pub async fn update_path(pool: &SqlitePool, id: i64, new_path: &Path) -> Result<bool> {
    let path = new_path.to_string_lossy().to_string();

    let result = sqlx::query("UPDATE works SET path = ? WHERE id = ?")
        .bind(&path)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                StorageError::Duplicate(path.clone())
            } else {
                StorageError::Database(e)
            }
        })?;

    Ok(result.rows_affected() > 0)
}

/// Delete a work record
///
/// Returns `Ok(false)` if no work has this id.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM works WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn row_to_work(row: &SqliteRow) -> Result<Work> {
    let work_type_str = row.get::<String, _>("work_type");
    let work_type = WorkType::from_str(&work_type_str).ok_or_else(|| {
        StorageError::Query(format!("invalid work type: {work_type_str}"))
    })?;

    let created_at = chrono::DateTime::from_timestamp(row.get::<i64, _>("created_at"), 0)
        .ok_or_else(|| StorageError::Query("invalid timestamp".to_string()))?;

    Ok(Work {
        id: row.get("id"),
        title: row.get("title"),
        path: PathBuf::from(row.get::<String, _>("path")),
        work_type,
        page_count: row.get::<i64, _>("page_count") as u32,
        created_at,
        artist: row.get("artist"),
        year: row.get::<Option<i64>, _>("year").map(|y| y as i32),
        genre: row.get("genre"),
        circle: row.get("circle"),
        origin: row.get("origin"),
    })
}
