/// Database handle implementing the engine's collaborator traits
use crate::error::{Result, StorageError};
use crate::{settings, works};
use async_trait::async_trait;
use folio_core::types::{AppSettings, CreateWork, Work};
use folio_core::{CatalogStore, FolioError, SettingsProvider};
use sqlx::sqlite::SqlitePool;
use std::path::Path;

/// SQLite-backed catalog database
///
/// Explicitly constructed and owned by the caller; clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) a database and run migrations
    ///
    /// # Errors
    /// Returns an error if the connection or a migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = crate::create_pool(database_url).await?;

        crate::run_migrations(&pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Create a database from an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for Database {
    async fn create_work(&self, fields: CreateWork) -> folio_core::Result<Work> {
        works::create(&self.pool, fields)
            .await
            .map_err(FolioError::from)
    }

    async fn get_work(&self, id: i64) -> folio_core::Result<Work> {
        works::get(&self.pool, id)
            .await
            .map_err(FolioError::from)?
            .ok_or_else(|| FolioError::not_found("Work", id.to_string()))
    }

    async fn list_works(&self) -> folio_core::Result<Vec<Work>> {
        works::list_all(&self.pool).await.map_err(FolioError::from)
    }

    async fn update_work_path(&self, id: i64, new_path: &Path) -> folio_core::Result<()> {
        let updated = works::update_path(&self.pool, id, new_path)
            .await
            .map_err(FolioError::from)?;

        if updated {
            Ok(())
        } else {
            Err(FolioError::not_found("Work", id.to_string()))
        }
    }

    async fn delete_work(&self, id: i64) -> folio_core::Result<()> {
        let deleted = works::delete(&self.pool, id)
            .await
            .map_err(FolioError::from)?;

        if deleted {
            Ok(())
        } else {
            Err(FolioError::not_found("Work", id.to_string()))
        }
    }
}

#[async_trait]
impl SettingsProvider for Database {
    async fn app_settings(&self) -> folio_core::Result<AppSettings> {
        settings::load(&self.pool).await.map_err(FolioError::from)
    }
}
