//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using real SQLite files (NOT
//! in-memory) to match production behavior and properly test migrations,
//! constraints, and indexes.

use folio_core::types::{CreateWork, WorkType};
use folio_storage::Database;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub db: Database,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = Database::new(&db_url)
            .await
            .expect("Failed to open test database");

        Self {
            db,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &sqlx::SqlitePool {
        self.db.pool()
    }
}

/// Test fixture: fields for a folder work at the given path
pub fn folder_work(title: &str, path: &str, artist: Option<&str>) -> CreateWork {
    CreateWork {
        title: title.to_string(),
        path: PathBuf::from(path),
        work_type: WorkType::Folder,
        page_count: 3,
        artist: artist.map(str::to_string),
        year: None,
        genre: None,
        circle: None,
        origin: None,
    }
}
