//! Managed-root reconciliation
//!
//! Walks the library root and reconciles what the catalog believes with what
//! is actually on disk: orphaned-but-valid folders are re-registered, catalog
//! entries without files are flagged for the caller. Nothing is ever deleted
//! here.

use crate::engine::CancelFlag;
use crate::types::{RescanSummary, ScanProgress};
use crate::{metadata, scanner, Result, SyncError};
use folio_core::types::{CreateWork, WorkType};
use folio_core::CatalogStore;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) async fn run_rescan(
    store: Arc<dyn CatalogStore>,
    library_root: PathBuf,
    cancel: CancelFlag,
    progress: mpsc::Sender<ScanProgress>,
) -> Result<RescanSummary> {
    let works = store.list_works().await?;
    let known: HashSet<PathBuf> = works.iter().map(|work| work.path.clone()).collect();

    let candidates = scanner::collect_candidates(&library_root);
    let total = candidates.len();
    let _ = progress.send(ScanProgress::Started { total }).await;

    let mut registered = 0usize;
    let mut failed = 0usize;

    for (index, dir) in candidates.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let file_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let _ = progress
            .send(ScanProgress::Processing {
                current: index + 1,
                total,
                file_name: file_name.clone(),
            })
            .await;

        if known.contains(dir) {
            continue;
        }

        // Folders nested inside a registered work belong to that work
        if known.iter().any(|path| dir.starts_with(path) && dir != path) {
            continue;
        }

        // Orphan folder: register it from its parsed name
        let parsed = metadata::parse_folder_name(&file_name);
        let page_count = scanner::count_images_in_dir(dir);

        let created = store
            .create_work(CreateWork {
                title: parsed.title,
                path: dir.clone(),
                work_type: WorkType::Folder,
                page_count: page_count as u32,
                artist: parsed.artist,
                year: None,
                genre: None,
                circle: None,
                origin: None,
            })
            .await;

        match created {
            Ok(work) => {
                tracing::info!("Registered orphan {} as work {}", dir.display(), work.id);
                registered += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to register orphan {}: {}", dir.display(), e);
                failed += 1;
            }
        }
    }

    // Flag catalog entries that disagree with the filesystem; the caller
    // decides what to do with them
    let mut missing_paths = Vec::new();
    let mut empty_paths = Vec::new();
    for work in &works {
        if !work.path.exists() {
            tracing::warn!(
                "Work {} folder is missing: {}",
                work.id,
                work.path.display()
            );
            missing_paths.push(work.path.clone());
        } else if scanner::count_images_in_dir(&work.path) == 0 {
            tracing::warn!(
                "Work {} folder has no page images: {}",
                work.id,
                work.path.display()
            );
            empty_paths.push(work.path.clone());
        }
    }

    if cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    tracing::info!(
        "Rescan finished: {} registered, {} failed, {} missing, {} empty",
        registered,
        failed,
        missing_paths.len(),
        empty_paths.len()
    );

    let _ = progress
        .send(ScanProgress::Completed { registered, failed })
        .await;

    Ok(RescanSummary {
        registered,
        failed,
        missing_paths,
        empty_paths,
    })
}
