//! Import pipeline and bulk orchestration
//!
//! A single import materializes one source folder into managed storage and
//! registers it. The bulk orchestrator drives the same pipeline over a batch
//! strictly sequentially, absorbing per-item failures into counters.

use crate::engine::CancelFlag;
use crate::path_template::{PathTemplate, DEFAULT_TEMPLATE};
use crate::types::{
    BulkImportProgress, BulkImportSummary, ImportMode, ImportRequest, ImportResult,
};
use crate::{copy, scanner, Result, SyncError};
use folio_core::types::{AppSettings, CreateWork, WorkType};
use folio_core::CatalogStore;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Import one source folder into managed storage
///
/// Each step must succeed before the next commits: source validation,
/// destination rendering, collision checks, filesystem transfer, catalog
/// registration. A registration failure after the transfer never deletes
/// the transferred files; it surfaces as `SyncError::PartialCommit` with the
/// destination path for manual reconciliation.
pub(crate) async fn import_one(
    store: &dyn CatalogStore,
    settings: &AppSettings,
    request: &ImportRequest,
) -> Result<ImportResult> {
    let source = request.source_path.as_path();
    if !source.is_dir() {
        return Err(SyncError::InvalidSource(format!(
            "{} is not a directory",
            source.display()
        )));
    }

    let images = scanner::list_images_in_dir(source)?;
    if images.is_empty() {
        return Err(SyncError::InvalidSource(format!(
            "no image files in {}",
            source.display()
        )));
    }

    if request.title.trim().is_empty() {
        return Err(SyncError::InvalidSource("title must not be empty".to_string()));
    }

    let library_root = settings.library_root.as_deref().ok_or_else(|| {
        SyncError::Configuration("library root is not configured".to_string())
    })?;

    let template = PathTemplate::new(
        settings
            .directory_template
            .as_deref()
            .unwrap_or(DEFAULT_TEMPLATE),
    );
    let relative = template.render(&request.metadata())?;
    let dest = library_root.join(relative);

    if paths_overlap(source, &dest) {
        return Err(SyncError::InvalidSource(format!(
            "source {} and destination {} overlap",
            source.display(),
            dest.display()
        )));
    }

    if dest.exists() {
        return Err(SyncError::DestinationExists(dest));
    }

    // Reject catalog collisions before the filesystem is touched
    let registered = store.list_works().await?;
    if registered.iter().any(|work| work.path == dest) {
        return Err(SyncError::DuplicatePath(dest.display().to_string()));
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match request.mode {
        ImportMode::Copy => {
            if let Err(e) = copy::copy_dir(source, &dest, true) {
                let _ = std::fs::remove_dir_all(&dest);
                return Err(e);
            }
        }
        // move_dir cleans up its own partial destination on failure
        ImportMode::Move => copy::move_dir(source, &dest)?,
    }

    let page_count = scanner::count_images_in_dir(&dest);

    let created = store
        .create_work(CreateWork {
            title: request.title.clone(),
            path: dest.clone(),
            work_type: WorkType::Folder,
            page_count: page_count as u32,
            artist: request.artist.clone(),
            year: request.year,
            genre: request.genre.clone(),
            circle: request.circle.clone(),
            origin: request.origin.clone(),
        })
        .await;

    match created {
        Ok(work) => {
            tracing::info!(
                "Imported {} as work {} ({} pages)",
                dest.display(),
                work.id,
                page_count
            );
            Ok(ImportResult {
                destination_path: dest,
                page_count,
            })
        }
        // The files are already in place; never delete them here
        Err(e) => Err(SyncError::PartialCommit {
            work_id: None,
            old_path: Some(request.source_path.clone()),
            destination: dest,
            reason: e.to_string(),
        }),
    }
}

/// Drive the import pipeline over a batch of requests
///
/// Strictly sequential. A single item's failure is counted and logged, never
/// escalated; the terminal event is always `Completed` unless the batch is
/// cancelled.
pub(crate) async fn run_bulk_import(
    store: Arc<dyn CatalogStore>,
    settings: AppSettings,
    requests: Vec<ImportRequest>,
    cancel: CancelFlag,
    progress: mpsc::Sender<BulkImportProgress>,
) -> Result<BulkImportSummary> {
    let total = requests.len();
    let _ = progress.send(BulkImportProgress::Started { total }).await;

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for (index, request) in requests.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let _ = progress
            .send(BulkImportProgress::Importing {
                current: index + 1,
                total,
                title: request.title.clone(),
            })
            .await;

        match import_one(store.as_ref(), &settings, request).await {
            Ok(result) => {
                tracing::debug!(
                    "Bulk import: {} -> {}",
                    request.source_path.display(),
                    result.destination_path.display()
                );
                succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to import {}: {}",
                    request.source_path.display(),
                    e
                );
                failed += 1;
            }
        }
    }

    if cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let _ = progress
        .send(BulkImportProgress::Completed { succeeded, failed })
        .await;

    Ok(BulkImportSummary { succeeded, failed })
}

fn paths_overlap(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}
