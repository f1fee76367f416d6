//! Best-effort metadata parsing from folder names
//!
//! Scanned works commonly encode the artist in the folder name, either as a
//! leading bracket group (`[Artist] Title`) or a dash separator
//! (`Artist - Title`). Parsing never fails; when no pattern matches, the
//! whole name becomes the title and the artist stays absent.

use serde::{Deserialize, Serialize};

/// Title used when the input name is empty
pub const FALLBACK_TITLE: &str = "Untitled";

/// Title/artist guess extracted from a folder or file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMetadata {
    pub title: String,
    pub artist: Option<String>,
}

/// Parse a folder name into a title/artist guess
///
/// Pattern precedence: a leading `[Artist] Title` bracket group wins over an
/// `Artist - Title` separator; anything else falls back to the whole name
/// with trailing tag groups stripped.
pub fn parse_folder_name(folder_name: &str) -> ParsedMetadata {
    let name = folder_name.trim();
    if name.is_empty() {
        return ParsedMetadata {
            title: FALLBACK_TITLE.to_string(),
            artist: None,
        };
    }

    // Pattern: [artist] title
    if let Some(rest) = name.strip_prefix('[') {
        if let Some(close) = rest.find(']') {
            let artist = rest[..close].trim();
            let title = rest[close + 1..].trim();
            if !artist.is_empty() && !title.is_empty() {
                return ParsedMetadata {
                    title: strip_trailing_tags(title),
                    artist: Some(artist.to_string()),
                };
            }
        }
    }

    // Pattern: artist - title
    if let Some(sep_pos) = name.find(" - ") {
        let artist = name[..sep_pos].trim();
        let title = name[sep_pos + 3..].trim();
        if !artist.is_empty() && !title.is_empty() {
            return ParsedMetadata {
                title: strip_trailing_tags(title),
                artist: Some(artist.to_string()),
            };
        }
    }

    ParsedMetadata {
        title: strip_trailing_tags(name),
        artist: None,
    }
}

/// Strip trailing tag groups like `(C97)` or `[DL]` from a title.
///
/// Falls back to the input when stripping would leave nothing, so names that
/// are only tag groups survive as-is.
fn strip_trailing_tags(title: &str) -> String {
    let mut cleaned = title.trim();

    loop {
        let shorter = if cleaned.ends_with(']') {
            cleaned.rfind('[').map(|open| cleaned[..open].trim_end())
        } else if cleaned.ends_with(')') {
            cleaned.rfind('(').map(|open| cleaned[..open].trim_end())
        } else {
            None
        };

        match shorter {
            Some(rest) if !rest.is_empty() => cleaned = rest,
            _ => break,
        }
    }

    if cleaned.is_empty() {
        title.trim().to_string()
    } else {
        cleaned.to_string()
    }
}
