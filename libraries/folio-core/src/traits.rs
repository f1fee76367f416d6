/// Collaborator traits for the Folio engine
use crate::error::Result;
use crate::types::{AppSettings, CreateWork, Work};
use async_trait::async_trait;
use std::path::Path;

/// Catalog store trait
///
/// Implementers provide persistence for work records. Each call is atomic
/// with respect to the others; no partially written record is ever visible.
/// `list_works` guarantees nothing about ordering beyond being stable for a
/// single iteration.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Register a new work, assigning its id
    ///
    /// # Errors
    /// Returns `FolioError::Duplicate` if the path is already registered
    async fn create_work(&self, fields: CreateWork) -> Result<Work>;

    /// Get a work by id
    ///
    /// # Errors
    /// Returns `FolioError::NotFound` if no work has this id
    async fn get_work(&self, id: i64) -> Result<Work>;

    /// List all registered works
    async fn list_works(&self) -> Result<Vec<Work>>;

    /// Update the managed path of a work
    ///
    /// # Errors
    /// Returns `FolioError::NotFound` if no work has this id
    async fn update_work_path(&self, id: i64, new_path: &Path) -> Result<()>;

    /// Delete a work record
    ///
    /// # Errors
    /// Returns `FolioError::NotFound` if no work has this id
    async fn delete_work(&self, id: i64) -> Result<()>;
}

/// Read-only access to application settings
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Current application settings
    async fn app_settings(&self) -> Result<AppSettings>;
}
