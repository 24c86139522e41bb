// src/entity/note.rs
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A stored note. The title is the key it is stored under, not a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub content: String,
    pub tags: Vec<String>,
    /// Public URLs of uploaded blobs, in upload order
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(content: String, tags: Vec<String>) -> Self {
        Self {
            content,
            tags,
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Raw form input for a save, before validation.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    /// Comma-separated tag list as typed
    pub tags_raw: String,
    pub attachments: Vec<PathBuf>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags_raw: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags_raw: tags_raw.into(),
            attachments: Vec::new(),
        }
    }

    /// Validate the draft and split it into its key and a fresh note.
    pub fn into_note(self) -> Result<(String, Note, Vec<PathBuf>), ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let note = Note::new(self.content.trim().to_string(), parse_tags(&self.tags_raw));
        Ok((title.to_string(), note, self.attachments))
    }
}

/// Split on commas, trim each segment and drop the empty ones.
/// Duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
