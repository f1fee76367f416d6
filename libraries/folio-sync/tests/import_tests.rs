//! Integration tests for the single-import pipeline

mod test_helpers;

use folio_core::CatalogStore;
use folio_sync::{ImportMode, SyncError};
use test_helpers::{import_request, make_work_folder, setup, setup_unconfigured};

#[tokio::test]
async fn copy_import_materializes_and_registers() {
    let env = setup().await;
    let source = make_work_folder(env.temp.path(), "scan1", 12);

    let result = env
        .engine
        .import_one(import_request(&source, "Work A", None, ImportMode::Copy))
        .await
        .expect("import should succeed");

    // Null artist renders as the Unknown fallback segment
    let expected = env.library_root.join("Unknown").join("Work A");
    assert_eq!(result.destination_path, expected);
    assert_eq!(result.page_count, 12);
    assert!(expected.join("01.jpg").exists());

    // Copy leaves the source untouched
    assert!(source.exists());
    assert!(source.join("12.jpg").exists());

    let works = env.db.list_works().await.expect("list should succeed");
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].title, "Work A");
    assert_eq!(works[0].path, expected);
    assert_eq!(works[0].page_count, 12);
    assert_eq!(works[0].artist, None);
}

#[tokio::test]
async fn move_import_removes_source() {
    let env = setup().await;
    let source = make_work_folder(env.temp.path(), "scan1", 12);

    let result = env
        .engine
        .import_one(import_request(
            &source,
            "Work A",
            Some("Artist"),
            ImportMode::Move,
        ))
        .await
        .expect("import should succeed");

    let expected = env.library_root.join("Artist").join("Work A");
    assert_eq!(result.destination_path, expected);
    assert_eq!(result.page_count, 12);
    assert!(expected.join("01.jpg").exists());
    assert!(!source.exists());
}

#[tokio::test]
async fn copy_import_preserves_nested_folders_but_counts_direct_pages() {
    let env = setup().await;
    let source = make_work_folder(env.temp.path(), "scan1", 3);
    make_work_folder(&source, "extras", 2);

    let result = env
        .engine
        .import_one(import_request(
            &source,
            "Nested",
            Some("Artist"),
            ImportMode::Copy,
        ))
        .await
        .expect("import should succeed");

    // Nested images are copied but not flattened into the page count
    assert_eq!(result.page_count, 3);
    assert!(result
        .destination_path
        .join("extras")
        .join("01.jpg")
        .exists());
}

#[tokio::test]
async fn import_rejects_source_without_images() {
    let env = setup().await;
    let source = env.temp.path().join("empty");
    std::fs::create_dir(&source).unwrap();

    let result = env
        .engine
        .import_one(import_request(&source, "Empty", None, ImportMode::Copy))
        .await;

    assert!(matches!(result, Err(SyncError::InvalidSource(_))));
    assert!(env.db.list_works().await.unwrap().is_empty());
}

#[tokio::test]
async fn import_rejects_missing_source() {
    let env = setup().await;
    let source = env.temp.path().join("nowhere");

    let result = env
        .engine
        .import_one(import_request(&source, "Ghost", None, ImportMode::Copy))
        .await;

    assert!(matches!(result, Err(SyncError::InvalidSource(_))));
}

#[tokio::test]
async fn import_rejects_existing_destination() {
    let env = setup().await;
    let source = make_work_folder(env.temp.path(), "scan1", 2);
    std::fs::create_dir_all(env.library_root.join("Artist").join("Work A")).unwrap();

    let result = env
        .engine
        .import_one(import_request(
            &source,
            "Work A",
            Some("Artist"),
            ImportMode::Copy,
        ))
        .await;

    assert!(matches!(result, Err(SyncError::DestinationExists(_))));
    // No silent overwrite, no registration
    assert!(env.db.list_works().await.unwrap().is_empty());
    assert!(source.exists());
}

#[tokio::test]
async fn import_rejects_registered_destination_path() {
    let env = setup().await;
    let first = make_work_folder(env.temp.path(), "scan1", 2);
    env.engine
        .import_one(import_request(&first, "Work A", Some("Artist"), ImportMode::Move))
        .await
        .expect("first import should succeed");

    // Remove the materialized folder so only the catalog entry collides
    std::fs::remove_dir_all(env.library_root.join("Artist").join("Work A")).unwrap();

    let second = make_work_folder(env.temp.path(), "scan2", 2);
    let result = env
        .engine
        .import_one(import_request(
            &second,
            "Work A",
            Some("Artist"),
            ImportMode::Copy,
        ))
        .await;

    assert!(matches!(result, Err(SyncError::DuplicatePath(_))));
    assert!(second.exists());
}

#[tokio::test]
async fn import_rejects_empty_title() {
    let env = setup().await;
    let source = make_work_folder(env.temp.path(), "scan1", 2);

    let result = env
        .engine
        .import_one(import_request(&source, "   ", None, ImportMode::Copy))
        .await;

    assert!(matches!(result, Err(SyncError::InvalidSource(_))));
}

#[tokio::test]
async fn import_without_library_root_is_a_configuration_error() {
    let env = setup_unconfigured().await;
    let source = make_work_folder(env.temp.path(), "scan1", 2);

    let result = env
        .engine
        .import_one(import_request(&source, "Work A", None, ImportMode::Copy))
        .await;

    assert!(matches!(result, Err(SyncError::Configuration(_))));
    assert!(source.exists());
}

#[tokio::test]
async fn preview_import_path_renders_without_touching_disk() {
    let env = setup().await;

    let metadata = folio_core::types::WorkMetadata {
        title: "My Work".to_string(),
        artist: Some("Artist".to_string()),
        year: None,
        genre: None,
        circle: None,
        origin: None,
    };

    let preview = env
        .engine
        .preview_import_path(&metadata)
        .await
        .expect("preview should succeed");

    assert_eq!(preview, env.library_root.join("Artist").join("My Work"));
    assert!(!preview.exists());
}
