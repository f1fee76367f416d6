//! Folio Library Synchronization Engine
//!
//! This crate keeps the work catalog and the managed storage tree on disk in
//! agreement.
//!
//! # Features
//!
//! - Discovery of importable work folders outside managed storage
//! - Import into managed storage by copy or move, with template-derived paths
//! - Relocation of the whole library when the directory template changes,
//!   with a previewable plan before anything moves
//! - Rescan of the managed root to reconcile catalog and filesystem
//! - Progress streaming and cooperative cancellation for every long-running
//!   operation
//!
//! # Architecture
//!
//! - `metadata`: best-effort title/artist parsing from folder names
//! - `path_template`: storage path rendering and template validation
//! - `scanner`: filesystem discovery of candidate work folders
//! - `copy`: verified copy/move of work directories
//! - `importer`: single and bulk import pipeline
//! - `relocator`: two-phase (preview, commit) library relocation
//! - `rescan`: managed-root reconciliation
//! - `engine`: the `SyncEngine` facade tying the operations together

mod error;
mod types;

// Core modules
pub mod copy;
pub mod engine;
pub mod metadata;
pub mod path_template;
pub mod scanner;

mod importer;
mod relocator;
mod rescan;

pub use engine::{CancelFlag, SyncEngine};
pub use error::SyncError;
pub use metadata::{parse_folder_name, ParsedMetadata};
pub use path_template::{PathTemplate, TemplateValidation, DEFAULT_TEMPLATE};
pub use types::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, SyncError>;
