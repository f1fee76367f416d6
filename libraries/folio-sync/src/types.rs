//! Common types for the synchronization engine

use crate::metadata::ParsedMetadata;
use folio_core::types::WorkMetadata;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How an import materializes files in managed storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Copy the source tree into the library (preserves original)
    #[default]
    Copy,
    /// Move the source tree into the library (removes original)
    Move,
}

/// One explicit import request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Directory containing the work's page images
    pub source_path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub circle: Option<String>,
    pub origin: Option<String>,
    pub mode: ImportMode,
}

impl ImportRequest {
    /// Metadata used to render the destination path
    #[must_use]
    pub fn metadata(&self) -> WorkMetadata {
        WorkMetadata {
            title: self.title.clone(),
            artist: self.artist.clone(),
            year: self.year,
            genre: self.genre.clone(),
            circle: self.circle.clone(),
            origin: self.origin.clone(),
        }
    }
}

/// Result of a successful single import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub destination_path: PathBuf,
    pub page_count: usize,
}

/// A folder on disk that looks like an importable work
///
/// Transient: produced by discovery and consumed immediately, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredFolder {
    pub path: PathBuf,
    pub folder_name: String,
    pub image_count: usize,
    pub parsed_metadata: ParsedMetadata,
    pub already_registered: bool,
}

/// One entry of a relocation plan: where a work is and where the candidate
/// template would put it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationPreview {
    pub work_id: i64,
    pub title: String,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// Progress events emitted while discovering importable folders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum DiscoverProgress {
    #[serde(rename_all = "camelCase")]
    Scanning { scanned_dirs: usize },
    #[serde(rename_all = "camelCase")]
    Completed { found: usize },
}

/// Progress events emitted by a bulk import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum BulkImportProgress {
    #[serde(rename_all = "camelCase")]
    Started { total: usize },
    #[serde(rename_all = "camelCase")]
    Importing {
        current: usize,
        total: usize,
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    Completed { succeeded: usize, failed: usize },
}

/// Progress events emitted by a relocation commit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum RelocationProgress {
    #[serde(rename_all = "camelCase")]
    Started { total: usize },
    #[serde(rename_all = "camelCase")]
    Moving {
        current: usize,
        total: usize,
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        relocated: usize,
        skipped: usize,
        failed: usize,
    },
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

/// Progress events emitted by a library rescan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ScanProgress {
    #[serde(rename_all = "camelCase")]
    Started { total: usize },
    #[serde(rename_all = "camelCase")]
    Processing {
        current: usize,
        total: usize,
        file_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Completed { registered: usize, failed: usize },
}

/// Aggregate outcome of a bulk import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// A relocation item whose files moved but whose catalog update failed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCommitInfo {
    pub work_id: i64,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub reason: String,
}

/// Aggregate outcome of a relocation commit
///
/// `partial_commits` lists items that need manual reconciliation: the files
/// are at `new_path` but the catalog still points at `old_path`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationSummary {
    pub relocated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub partial_commits: Vec<PartialCommitInfo>,
}

/// Aggregate outcome of a library rescan
///
/// `missing_paths` are catalog entries whose folder no longer exists;
/// `empty_paths` are folders that exist but lost all their page images.
/// Both are flagged for the caller, never auto-deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescanSummary {
    pub registered: usize,
    pub failed: usize,
    pub missing_paths: Vec<PathBuf>,
    pub empty_paths: Vec<PathBuf>,
}
