//! Shared fixtures for engine integration tests
//!
//! Tests run against a real on-disk SQLite database and a temp-dir library
//! root, matching production behavior.

use folio_storage::{settings, Database};
use folio_sync::{ImportMode, ImportRequest, SyncEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Engine + database + library root, cleaned up on drop
pub struct TestEnv {
    pub engine: SyncEngine,
    pub db: Arc<Database>,
    pub library_root: PathBuf,
    pub temp: TempDir,
}

/// Set up an engine with a configured library root and the
/// `{artist}/{title}` template
pub async fn setup() -> TestEnv {
    setup_with_template("{artist}/{title}").await
}

/// Set up an engine with a configured library root and the given template
pub async fn setup_with_template(template: &str) -> TestEnv {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp.path().join("test.db");
    let db = Database::new(&format!("sqlite://{}", db_path.display()))
        .await
        .expect("Failed to open test database");

    let library_root = temp.path().join("library");
    std::fs::create_dir_all(&library_root).expect("Failed to create library root");

    settings::set_library_root(db.pool(), &library_root)
        .await
        .expect("Failed to set library root");
    settings::set_directory_template(db.pool(), template)
        .await
        .expect("Failed to set template");

    let db = Arc::new(db);
    let engine = SyncEngine::new(db.clone(), db.clone());

    TestEnv {
        engine,
        db,
        library_root,
        temp,
    }
}

/// Set up an engine whose library root was never configured
pub async fn setup_unconfigured() -> TestEnv {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp.path().join("test.db");
    let db = Database::new(&format!("sqlite://{}", db_path.display()))
        .await
        .expect("Failed to open test database");

    let db = Arc::new(db);
    let engine = SyncEngine::new(db.clone(), db.clone());

    TestEnv {
        engine,
        db,
        library_root: temp.path().join("unconfigured"),
        temp,
    }
}

/// Create a folder with `count` page images
pub fn make_work_folder(parent: &Path, name: &str, count: usize) -> PathBuf {
    let dir = parent.join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create work folder");
    for i in 0..count {
        std::fs::write(dir.join(format!("{:02}.jpg", i + 1)), format!("page {i}"))
            .expect("Failed to write page");
    }
    dir
}

/// Build an import request for a source folder
pub fn import_request(
    source: &Path,
    title: &str,
    artist: Option<&str>,
    mode: ImportMode,
) -> ImportRequest {
    ImportRequest {
        source_path: source.to_path_buf(),
        title: title.to_string(),
        artist: artist.map(str::to_string),
        year: None,
        genre: None,
        circle: None,
        origin: None,
        mode,
    }
}

/// Drain a progress receiver into a vector
pub async fn collect<T>(mut rx: tokio::sync::mpsc::Receiver<T>) -> Vec<T> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}
