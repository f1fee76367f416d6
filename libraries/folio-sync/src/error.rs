//! Error types for the synchronization engine

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] folio_core::FolioError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid template: {0}")]
    Template(String),

    #[error("Invalid import source: {0}")]
    InvalidSource(String),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Path already registered: {0}")]
    DuplicatePath(String),

    /// Filesystem mutation succeeded but the catalog update did not.
    /// Carries enough detail for manual reconciliation; the transferred
    /// files are left in place.
    #[error("Partial commit: files are at {} but catalog update failed: {reason}", .destination.display())]
    PartialCommit {
        work_id: Option<i64>,
        old_path: Option<PathBuf>,
        destination: PathBuf,
        reason: String,
    },

    #[error("Operation cancelled")]
    Cancelled,
}
