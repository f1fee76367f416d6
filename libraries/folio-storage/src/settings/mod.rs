//! Application settings storage
//!
//! Settings are stored as key-value pairs. Absent keys mean "not configured";
//! the engine treats an absent library root as a configuration error rather
//! than inventing a default location.

use crate::error::Result;
use folio_core::types::AppSettings;
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};

// Setting key constants
/// Absolute path of the managed library root
pub const SETTING_LIBRARY_ROOT: &str = "library.root";

/// Directory template for managed storage layout
pub const SETTING_DIRECTORY_TEMPLATE: &str = "library.directory_template";

/// Display label for single-image works
pub const SETTING_TYPE_LABEL_IMAGE: &str = "library.type_label_image";

/// Display label for multi-page folder works
pub const SETTING_TYPE_LABEL_FOLDER: &str = "library.type_label_folder";

/// Get a single setting value
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM app_settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get::<String, _>("value")))
}

/// Set a setting value
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO app_settings (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a setting
///
/// Returns `Ok(true)` if a setting was deleted, `Ok(false)` if none existed.
pub async fn unset(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM app_settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get the configured library root, if any
pub async fn get_library_root(pool: &SqlitePool) -> Result<Option<PathBuf>> {
    Ok(get(pool, SETTING_LIBRARY_ROOT).await?.map(PathBuf::from))
}

/// Set the library root
pub async fn set_library_root(pool: &SqlitePool, path: &Path) -> Result<()> {
    set(pool, SETTING_LIBRARY_ROOT, &path.to_string_lossy()).await
}

/// Get the configured directory template, if any
///
/// A stored blank value is treated the same as an absent key.
pub async fn get_directory_template(pool: &SqlitePool) -> Result<Option<String>> {
    Ok(get(pool, SETTING_DIRECTORY_TEMPLATE)
        .await?
        .filter(|t| !t.trim().is_empty()))
}

/// Set the directory template
pub async fn set_directory_template(pool: &SqlitePool, template: &str) -> Result<()> {
    set(pool, SETTING_DIRECTORY_TEMPLATE, template).await
}

/// Load the full application settings snapshot
pub async fn load(pool: &SqlitePool) -> Result<AppSettings> {
    let defaults = AppSettings::default();

    Ok(AppSettings {
        library_root: get_library_root(pool).await?,
        directory_template: get_directory_template(pool).await?,
        type_label_image: get(pool, SETTING_TYPE_LABEL_IMAGE)
            .await?
            .unwrap_or(defaults.type_label_image),
        type_label_folder: get(pool, SETTING_TYPE_LABEL_FOLDER)
            .await?
            .unwrap_or(defaults.type_label_folder),
    })
}
