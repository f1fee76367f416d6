//! Two-phase library relocation
//!
//! Moving files is destructive, so relocation is previewable: the plan is
//! computed without touching anything, and the commit phase replays it item
//! by item. Per item the filesystem move always happens before the catalog
//! update, so a mid-batch failure never leaves the catalog pointing at a
//! path with no content.

use crate::engine::CancelFlag;
use crate::path_template::PathTemplate;
use crate::types::{PartialCommitInfo, RelocationPreview, RelocationProgress, RelocationSummary};
use crate::{copy, Result, SyncError};
use folio_core::types::Work;
use folio_core::CatalogStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Render the relocation plan for every work under a candidate template
///
/// No-op entries (old path equals new path) are included; the commit phase
/// skips them. Collisions get a deterministic ` (n)` suffix, so repeated
/// previews over an unchanged catalog are identical.
pub(crate) fn compute_relocation_plan(
    works: &[Work],
    library_root: &Path,
    template: &PathTemplate,
) -> Result<Vec<RelocationPreview>> {
    let mut used: HashSet<PathBuf> = HashSet::new();
    let mut previews = Vec::with_capacity(works.len());

    for work in works {
        let relative = template.render(&work.metadata())?;
        let base = library_root.join(relative);

        let new_path = if base == work.path {
            base
        } else {
            resolve_collision(&base, &work.path, &used)
        };

        used.insert(new_path.clone());
        previews.push(RelocationPreview {
            work_id: work.id,
            title: work.title.clone(),
            old_path: work.path.clone(),
            new_path,
        });
    }

    Ok(previews)
}

fn resolve_collision(base: &Path, current: &Path, used: &HashSet<PathBuf>) -> PathBuf {
    let available =
        |candidate: &Path| !used.contains(candidate) && (!candidate.exists() || candidate == current);

    if available(base) {
        return base.to_path_buf();
    }

    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    for counter in 1u32.. {
        let candidate = base.with_file_name(format!("{name} ({counter})"));
        if available(&candidate) {
            return candidate;
        }
    }

    unreachable!()
}

/// Execute a relocation under the given template, streaming progress
///
/// A template that fails validation emits a terminal `Error` event. Per-item
/// failures are counted and the batch continues. A catalog update failing
/// after a successful move is reported in the summary and never reverted
/// automatically.
pub(crate) async fn run_relocation(
    store: Arc<dyn CatalogStore>,
    library_root: PathBuf,
    template: String,
    cancel: CancelFlag,
    progress: mpsc::Sender<RelocationProgress>,
) -> Result<RelocationSummary> {
    let template = PathTemplate::new(template);
    if let Err(e) = template.ensure_valid() {
        let _ = progress
            .send(RelocationProgress::Error {
                message: e.to_string(),
            })
            .await;
        return Err(e);
    }

    let works = match store.list_works().await {
        Ok(works) => works,
        Err(e) => {
            let _ = progress
                .send(RelocationProgress::Error {
                    message: e.to_string(),
                })
                .await;
            return Err(e.into());
        }
    };

    let plan = match compute_relocation_plan(&works, &library_root, &template) {
        Ok(plan) => plan,
        Err(e) => {
            let _ = progress
                .send(RelocationProgress::Error {
                    message: e.to_string(),
                })
                .await;
            return Err(e);
        }
    };

    let total = plan.len();
    let _ = progress.send(RelocationProgress::Started { total }).await;

    let mut relocated = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    let mut partial_commits = Vec::new();

    for (index, item) in plan.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let _ = progress
            .send(RelocationProgress::Moving {
                current: index + 1,
                total,
                title: item.title.clone(),
            })
            .await;

        if item.old_path == item.new_path {
            skipped += 1;
            continue;
        }

        if !item.old_path.exists() {
            tracing::warn!(
                "Skipping {}: folder {} is missing",
                item.title,
                item.old_path.display()
            );
            skipped += 1;
            continue;
        }

        if let Err(e) = copy::move_dir(&item.old_path, &item.new_path) {
            tracing::warn!(
                "Failed to move {} to {}: {}",
                item.old_path.display(),
                item.new_path.display(),
                e
            );
            failed += 1;
            continue;
        }

        match store.update_work_path(item.work_id, &item.new_path).await {
            Ok(()) => {
                copy::remove_empty_ancestors(&item.old_path, &library_root);
                relocated += 1;
            }
            Err(e) => {
                // Files moved but the catalog still points at the old path.
                // Never move back automatically; reverting risks a second
                // partial failure.
                tracing::error!(
                    "Catalog update failed for work {} after moving {} to {}: {}",
                    item.work_id,
                    item.old_path.display(),
                    item.new_path.display(),
                    e
                );
                failed += 1;
                partial_commits.push(PartialCommitInfo {
                    work_id: item.work_id,
                    old_path: item.old_path.clone(),
                    new_path: item.new_path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let _ = progress
        .send(RelocationProgress::Completed {
            relocated,
            skipped,
            failed,
        })
        .await;

    Ok(RelocationSummary {
        relocated,
        skipped,
        failed,
        partial_commits,
    })
}
