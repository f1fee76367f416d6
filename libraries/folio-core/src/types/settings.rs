//! Application settings consumed by the engine
//!
//! The engine reads these; it never writes them. A `None` library root means
//! managed storage has not been configured yet, and every operation that
//! touches managed storage must fail with a configuration error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings relevant to library synchronization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Absolute path of the managed library root, if configured
    pub library_root: Option<PathBuf>,

    /// Directory template for managed storage layout.
    /// `None` means "use the default layout".
    pub directory_template: Option<String>,

    /// Display label for single-image works
    pub type_label_image: String,

    /// Display label for multi-page folder works
    pub type_label_folder: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            library_root: None,
            directory_template: None,
            type_label_image: "image".to_string(),
            type_label_folder: "folder".to_string(),
        }
    }
}
