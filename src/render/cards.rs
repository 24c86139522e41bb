use std::fmt;

use crate::entity::Note;
use crate::repository::NoteRepository;

/// Number of content characters shown before the ellipsis.
pub const PREVIEW_CHARS: usize = 60;

/// Display unit for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub title: String,
    /// First characters of the content followed by "..."
    pub preview: String,
    /// Tags joined with ", "
    pub tags: String,
    pub attachments: Vec<String>,
}

impl NoteCard {
    pub fn new(title: &str, note: &Note) -> Self {
        let mut preview: String = note.content.chars().take(PREVIEW_CHARS).collect();
        preview.push_str("...");

        Self {
            title: title.to_string(),
            preview,
            tags: note.tags.join(", "),
            attachments: note.attachments.clone(),
        }
    }

    /// Attachment references joined with " | ", if there are any.
    pub fn attachment_line(&self) -> Option<String> {
        if self.attachments.is_empty() {
            None
        } else {
            Some(self.attachments.join(" | "))
        }
    }

    /// Markdown form with clickable attachment links.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("### {}\n\n{}\n", self.title, self.preview);
        if !self.tags.is_empty() {
            out.push_str(&format!("\n_{}_\n", self.tags));
        }
        if !self.attachments.is_empty() {
            let links: Vec<String> = self
                .attachments
                .iter()
                .map(|url| format!("[Attachment]({})", url))
                .collect();
            out.push_str(&format!("\n{}\n", links.join(" | ")));
        }
        out
    }
}

impl fmt::Display for NoteCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {}", self.preview)?;
        if !self.tags.is_empty() {
            writeln!(f, "  tags: {}", self.tags)?;
        }
        if let Some(line) = self.attachment_line() {
            writeln!(f, "  attachments: {}", line)?;
        }
        Ok(())
    }
}

/// One card per note matching `filter`, in repository order.
pub fn render_cards(notes: &NoteRepository, filter: &str) -> Vec<NoteCard> {
    notes
        .list(filter)
        .map(|(title, note)| NoteCard::new(title, note))
        .collect()
}
