//! Filesystem scanning for importable work folders
//!
//! A directory is a candidate work when it directly contains at least one
//! image file. Nested folders are their own candidates; their images are
//! never flattened into a parent's count.

use crate::engine::CancelFlag;
use crate::metadata;
use crate::types::{DiscoverProgress, DiscoveredFolder};
use crate::{Result, SyncError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// Supported page image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Check if a path is a supported image file
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// List image files directly inside a folder, sorted by name
pub fn list_images_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    images.sort();
    Ok(images)
}

/// Count image files directly inside a folder
///
/// An unreadable folder counts as zero, so it is silently not a candidate.
pub fn count_images_in_dir(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    let path = entry.path();
                    path.is_file() && is_image_file(&path)
                })
                .count()
        })
        .unwrap_or(0)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Collect candidate work directories under `root`
///
/// Used by rescan, where progress is reported per candidate rather than per
/// directory visited.
pub(crate) fn collect_candidates(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry.path()) || entry.path() == root)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir() && entry.path() != root)
        .map(|entry| entry.path().to_path_buf())
        .filter(|dir| count_images_in_dir(dir) > 0)
        .collect()
}

/// Walk `root` and stream discovery progress, returning the candidates found
///
/// The managed library subtree is excluded unless `root` itself lies inside
/// it (rescanning the library goes through `rescan` instead, but an explicit
/// discovery of the library root is allowed). Unreadable directories are
/// skipped without aborting the walk.
pub(crate) async fn run_discovery(
    root: PathBuf,
    library_root: PathBuf,
    registered: HashSet<PathBuf>,
    cancel: CancelFlag,
    progress: mpsc::Sender<DiscoverProgress>,
) -> Result<Vec<DiscoveredFolder>> {
    let scanning_library = root.starts_with(&library_root);

    let mut found = Vec::new();
    let mut scanned_dirs = 0usize;

    let walker = WalkDir::new(&root).into_iter().filter_entry(|entry| {
        let path = entry.path();
        if path == root {
            return true;
        }
        if is_hidden(path) {
            return false;
        }
        scanning_library || !path.starts_with(&library_root)
    });

    for entry in walker.filter_map(|entry| entry.ok()) {
        if !entry.file_type().is_dir() {
            continue;
        }
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let dir = entry.path();
        scanned_dirs += 1;
        let _ = progress
            .send(DiscoverProgress::Scanning { scanned_dirs })
            .await;

        if dir == library_root {
            continue;
        }

        let image_count = count_images_in_dir(dir);
        if image_count == 0 {
            continue;
        }

        let folder_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        found.push(DiscoveredFolder {
            path: dir.to_path_buf(),
            folder_name: folder_name.clone(),
            image_count,
            parsed_metadata: metadata::parse_folder_name(&folder_name),
            already_registered: registered.contains(dir),
        });
    }

    if cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    tracing::info!(
        "Discovery of {} finished: {} directories scanned, {} candidates",
        root.display(),
        scanned_dirs,
        found.len()
    );

    let _ = progress
        .send(DiscoverProgress::Completed { found: found.len() })
        .await;

    Ok(found)
}
