//! Path template validation and rendering for managed storage layout
//!
//! Templates like `{artist}/{title}` map a work's metadata onto a relative
//! path under the library root.
//!
//! # Available Placeholders
//!
//! | Placeholder | Description | Fallback |
//! |-------------|-------------|----------|
//! | `{title}` | Work title (required) | none |
//! | `{artist}` | Artist name | "Unknown" |
//! | `{year}` | Release year | "Unknown" |
//! | `{genre}` | Genre | "Unknown" |
//! | `{circle}` | Circle (group) name | "Unknown" |
//! | `{origin}` | Origin work / franchise | "Unknown" |
//!
//! Placeholder values are sanitized per path component, so metadata can
//! never inject extra path segments or traversal sequences. Validity is
//! re-checked at render time: metadata such as an empty title can make an
//! otherwise-valid template degenerate.

use crate::{Result, SyncError};
use folio_core::types::WorkMetadata;
use serde::Serialize;

/// Default layout used when no directory template is configured
pub const DEFAULT_TEMPLATE: &str = "{artist}/{title}";

/// Segment substituted for placeholders whose metadata field is absent
pub const UNKNOWN_SEGMENT: &str = "Unknown";

const KNOWN_PLACEHOLDERS: &[&str] = &["title", "artist", "year", "genre", "circle", "origin"];

/// Outcome of validating a template string
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateValidation {
    pub valid: bool,
    /// `None` iff `valid`
    pub error: Option<String>,
}

/// Path template parser and resolver
#[derive(Debug, Clone)]
pub struct PathTemplate {
    template: String,
}

impl Default for PathTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PathTemplate {
    /// Create a new path template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Get the template string
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Validate the template string
    pub fn validate(&self) -> TemplateValidation {
        match self.ensure_valid() {
            Ok(()) => TemplateValidation {
                valid: true,
                error: None,
            },
            Err(e) => TemplateValidation {
                valid: false,
                error: Some(e.to_string()),
            },
        }
    }

    /// Check the template, failing with `SyncError::Template` when invalid
    pub fn ensure_valid(&self) -> Result<()> {
        let template = self.template.trim();
        if template.is_empty() {
            return Err(SyncError::Template("template is empty".to_string()));
        }
        if template.starts_with('/') || template.starts_with('\\') {
            return Err(SyncError::Template(
                "template must render a relative path".to_string(),
            ));
        }

        let mut has_title = false;
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| SyncError::Template("unclosed placeholder".to_string()))?;
            let name = &after[..close];
            if name.is_empty() {
                return Err(SyncError::Template("empty placeholder".to_string()));
            }
            if !KNOWN_PLACEHOLDERS.contains(&name) {
                return Err(SyncError::Template(format!(
                    "unknown placeholder: {{{name}}}"
                )));
            }
            if name == "title" {
                has_title = true;
            }
            rest = &after[close + 1..];
        }

        if !has_title {
            return Err(SyncError::Template(
                "the {title} placeholder is required".to_string(),
            ));
        }

        for segment in template.split('/') {
            if segment.trim() == ".." {
                return Err(SyncError::Template(
                    "template must not traverse upward".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Render the template against a work's metadata
    ///
    /// Returns a relative path string under the library root. Segments that
    /// sanitize to nothing are dropped; a fully empty result is an error, so
    /// degenerate metadata is caught here rather than at import time.
    pub fn render(&self, metadata: &WorkMetadata) -> Result<String> {
        self.ensure_valid()?;

        let mut segments = Vec::new();
        for raw_segment in self.template.trim().split('/') {
            let rendered = render_segment(raw_segment, metadata);
            let cleaned = sanitize_component(&rendered);
            if !cleaned.is_empty() {
                segments.push(cleaned);
            }
        }

        if segments.is_empty() {
            return Err(SyncError::Template("rendered path is empty".to_string()));
        }

        Ok(segments.join("/"))
    }
}

fn render_segment(segment: &str, metadata: &WorkMetadata) -> String {
    let mut out = String::new();
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                out.push_str(&resolve_placeholder(&after[..close], metadata));
                rest = &after[close + 1..];
            }
            None => {
                // ensure_valid rejects unclosed placeholders; keep the literal
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve_placeholder(name: &str, metadata: &WorkMetadata) -> String {
    let value = match name {
        "title" => Some(metadata.title.clone()),
        "artist" => metadata.artist.clone(),
        "year" => metadata.year.map(|y| y.to_string()),
        "genre" => metadata.genre.clone(),
        "circle" => metadata.circle.clone(),
        "origin" => metadata.origin.clone(),
        _ => None,
    };

    value.unwrap_or_else(|| UNKNOWN_SEGMENT.to_string())
}

/// Sanitize a single path component for filesystem safety
///
/// Replaces separators and characters that are invalid on common
/// filesystems, trims whitespace and trailing dots, and prefixes Windows
/// reserved device names. An all-junk component sanitizes to the empty
/// string so callers can drop it.
pub fn sanitize_component(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| match c {
            // Invalid on Windows: < > : " / \ | ? *
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Windows dislikes trailing dots and spaces
    let trimmed = sanitized.trim().trim_end_matches('.').trim_end();

    let reserved = [
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];

    let upper = trimmed.to_uppercase();
    if reserved.contains(&upper.as_str()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Canned metadata for template preview UIs
#[must_use]
pub fn sample_metadata() -> WorkMetadata {
    WorkMetadata {
        title: "My Artwork".to_string(),
        artist: Some("Artist Name".to_string()),
        year: Some(2025),
        genre: Some("Illustration".to_string()),
        circle: Some("Circle".to_string()),
        origin: Some("Original".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_metadata() -> WorkMetadata {
        WorkMetadata {
            title: "Work Title".to_string(),
            artist: Some("Artist".to_string()),
            year: Some(2024),
            genre: Some("Fantasy".to_string()),
            circle: Some("Circle".to_string()),
            origin: Some("Original".to_string()),
        }
    }

    #[test]
    fn validate_accepts_known_placeholders() {
        assert!(PathTemplate::new("{artist}/{title}").validate().valid);
        assert!(PathTemplate::new("{genre}/{circle}/{year} - {title}")
            .validate()
            .valid);
        assert!(PathTemplate::new("{title}").validate().valid);
    }

    #[test]
    fn validate_rejects_empty_template() {
        let validation = PathTemplate::new("   ").validate();
        assert!(!validation.valid);
        assert!(validation.error.is_some());
    }

    #[test]
    fn validate_rejects_unknown_placeholder() {
        let validation = PathTemplate::new("{series}/{title}").validate();
        assert!(!validation.valid);
        assert!(validation.error.unwrap().contains("{series}"));
    }

    #[test]
    fn validate_rejects_unclosed_placeholder() {
        assert!(!PathTemplate::new("{artist/{title}").validate().valid);
        assert!(!PathTemplate::new("{title}/{artist").validate().valid);
    }

    #[test]
    fn validate_rejects_empty_placeholder() {
        assert!(!PathTemplate::new("{}/{title}").validate().valid);
    }

    #[test]
    fn validate_requires_title() {
        let validation = PathTemplate::new("{artist}/{year}").validate();
        assert!(!validation.valid);
        assert!(validation.error.unwrap().contains("{title}"));
    }

    #[test]
    fn validate_rejects_absolute_path() {
        assert!(!PathTemplate::new("/{title}").validate().valid);
    }

    #[test]
    fn validate_rejects_traversal() {
        assert!(!PathTemplate::new("../{title}").validate().valid);
        assert!(!PathTemplate::new("{artist}/../{title}").validate().valid);
    }

    #[test]
    fn render_basic_template() {
        let rendered = PathTemplate::new("{artist}/{title}")
            .render(&full_metadata())
            .unwrap();
        assert_eq!(rendered, "Artist/Work Title");
    }

    #[test]
    fn render_with_literal_text() {
        let rendered = PathTemplate::new("{artist}/{year} - {title}")
            .render(&full_metadata())
            .unwrap();
        assert_eq!(rendered, "Artist/2024 - Work Title");
    }

    #[test]
    fn render_null_fields_use_unknown() {
        let metadata = WorkMetadata {
            title: "Work Title".to_string(),
            artist: None,
            year: None,
            genre: None,
            circle: None,
            origin: None,
        };

        let rendered = PathTemplate::new("{artist}/{title}")
            .render(&metadata)
            .unwrap();
        assert_eq!(rendered, "Unknown/Work Title");
    }

    #[test]
    fn render_sanitizes_separators_in_values() {
        let mut metadata = full_metadata();
        metadata.artist = Some("A/B".to_string());
        metadata.title = "Sub\\Title".to_string();

        let rendered = PathTemplate::new("{artist}/{title}")
            .render(&metadata)
            .unwrap();
        assert_eq!(rendered, "A_B/Sub_Title");
    }

    #[test]
    fn render_sanitizes_traversal_in_values() {
        let mut metadata = full_metadata();
        metadata.artist = Some("..".to_string());

        let rendered = PathTemplate::new("{artist}/{title}")
            .render(&metadata)
            .unwrap();
        // The ".." component sanitizes away entirely
        assert_eq!(rendered, "Work Title");
        assert!(!rendered.contains(".."));
    }

    #[test]
    fn render_empty_title_is_degenerate() {
        let mut metadata = full_metadata();
        metadata.title = String::new();

        let result = PathTemplate::new("{title}").render(&metadata);
        assert!(matches!(result, Err(SyncError::Template(_))));
    }

    #[test]
    fn render_invalid_template_fails() {
        let result = PathTemplate::new("{series}").render(&full_metadata());
        assert!(matches!(result, Err(SyncError::Template(_))));
    }

    #[test]
    fn render_default_template() {
        let rendered = PathTemplate::default().render(&sample_metadata()).unwrap();
        assert_eq!(rendered, "Artist Name/My Artwork");
    }

    #[test]
    fn validate_and_render_agree_on_full_metadata() {
        let templates = [
            "{artist}/{title}",
            "{title}",
            "{series}/{title}",
            "{artist}/{year}",
            "../{title}",
            "",
        ];

        for template in templates {
            let template = PathTemplate::new(template);
            let valid = template.validate().valid;
            let renders = template.render(&full_metadata()).is_ok();
            assert_eq!(valid, renders, "disagreement for {:?}", template.template());
        }
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("Valid Name"), "Valid Name");
        assert_eq!(sanitize_component("Artist/Work"), "Artist_Work");
        assert_eq!(sanitize_component("Work: The Sequel"), "Work_ The Sequel");
        assert_eq!(sanitize_component("A<B>C"), "A_B_C");
        assert_eq!(sanitize_component("  Trimmed  "), "Trimmed");
        assert_eq!(sanitize_component("trailing..."), "trailing");
        assert_eq!(sanitize_component("CON"), "_CON"); // Windows reserved
        assert_eq!(sanitize_component(""), "");
        assert_eq!(sanitize_component(".."), "");
    }
}
