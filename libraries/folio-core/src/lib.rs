//! Folio Core
//!
//! Domain types, collaborator traits, and error handling for the Folio
//! catalog manager.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Work`, `WorkMetadata`, `AppSettings`, etc.
//! - **Collaborator Traits**: `CatalogStore`, `SettingsProvider`
//! - **Error Handling**: Unified `FolioError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use folio_core::types::{CreateWork, WorkType};
//! use std::path::PathBuf;
//!
//! let fields = CreateWork {
//!     title: "My Work".to_string(),
//!     path: PathBuf::from("/library/Artist/My Work"),
//!     work_type: WorkType::Folder,
//!     page_count: 12,
//!     artist: Some("Artist".to_string()),
//!     year: None,
//!     genre: None,
//!     circle: None,
//!     origin: None,
//! };
//! assert_eq!(fields.work_type.as_str(), "folder");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{FolioError, Result};
pub use traits::{CatalogStore, SettingsProvider};
pub use types::{AppSettings, CreateWork, Work, WorkMetadata, WorkType};
