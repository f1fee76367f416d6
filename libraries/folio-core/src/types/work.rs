//! Catalog work types
//!
//! A `Work` is one page-based visual item (a scanned book, a folder of
//! illustrations) together with its managed storage location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Discriminator for how a work is stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    /// A single standalone image file
    Image,
    /// A folder of page images
    #[default]
    Folder,
}

impl WorkType {
    /// Convert to string for database storage
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Folder => "folder",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "folder" => Some(Self::Folder),
            _ => None,
        }
    }
}

/// A registered work in the catalog
///
/// Invariant: exactly one `Work` exists per managed path, and the path is
/// expected to exist on disk while the work is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    /// Store-assigned identifier, immutable once assigned
    pub id: i64,

    /// Display title (non-empty)
    pub title: String,

    /// Absolute managed storage path, unique across all works
    pub path: PathBuf,

    /// How the work is stored on disk
    pub work_type: WorkType,

    /// Number of page images
    pub page_count: u32,

    /// When the work was registered
    pub created_at: DateTime<Utc>,

    /// Artist name, if known
    pub artist: Option<String>,

    /// Release year, if known
    pub year: Option<i32>,

    /// Genre, if known
    pub genre: Option<String>,

    /// Circle (group) name, if known
    pub circle: Option<String>,

    /// Origin work / franchise, if known
    pub origin: Option<String>,
}

impl Work {
    /// Project this work into the metadata used for path template rendering
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

/// Fields for registering a new work (id and timestamp are store-assigned)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWork {
    pub title: String,
    pub path: PathBuf,
    pub work_type: WorkType,
    pub page_count: u32,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub circle: Option<String>,
    pub origin: Option<String>,
}

/// Descriptive metadata used to render a storage path for a work
///
/// Optional fields are genuinely absent when `None`; rendering logic
/// distinguishes "absent" from "empty string".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkMetadata {
    pub title: String,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub circle: Option<String>,
    pub origin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_type_roundtrip() {
        assert_eq!(WorkType::from_str("folder"), Some(WorkType::Folder));
        assert_eq!(WorkType::from_str("image"), Some(WorkType::Image));
        assert_eq!(WorkType::from_str("other"), None);
        assert_eq!(WorkType::Folder.as_str(), "folder");
        assert_eq!(WorkType::Image.as_str(), "image");
    }

    #[test]
    fn test_work_metadata_projection() {
        let work = Work {
            id: 1,
            title: "Title".to_string(),
            path: PathBuf::from("/library/Title"),
            work_type: WorkType::Folder,
            page_count: 3,
            created_at: Utc::now(),
            artist: Some("Artist".to_string()),
            year: Some(2024),
            genre: None,
            circle: None,
            origin: None,
        };

        let metadata = work.metadata();
        assert_eq!(metadata.title, "Title");
        assert_eq!(metadata.artist.as_deref(), Some("Artist"));
        assert_eq!(metadata.year, Some(2024));
        assert_eq!(metadata.genre, None);
    }
}
