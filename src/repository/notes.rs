use indexmap::IndexMap;

use crate::entity::Note;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Title → note mapping in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NoteRepository {
    notes: IndexMap<String, Note>,
}

impl NoteRepository {
    pub const STORAGE_KEY: &'static str = "notes";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the local store. A missing entry yields an empty repository.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let notes = match store.get_item(Self::STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => IndexMap::new(),
        };
        Ok(Self { notes })
    }

    /// Rewrite the whole mapping to the local store.
    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let raw = serde_json::to_string(&self.notes)?;
        store.set_item(Self::STORAGE_KEY, &raw)
    }

    /// Insert or replace the note stored under `title`.
    ///
    /// A replaced title keeps its original position and creation time;
    /// everything else is overwritten.
    pub fn upsert(&mut self, title: String, mut note: Note) -> Option<Note> {
        if let Some(existing) = self.notes.get(&title) {
            note.created_at = existing.created_at;
        }
        self.notes.insert(title, note)
    }

    pub fn get(&self, title: &str) -> Option<&Note> {
        self.notes.get(title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Note> {
        self.notes.get_mut(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.notes.contains_key(title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.notes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Note)> {
        self.notes.iter().map(|(title, note)| (title.as_str(), note))
    }

    /// Notes whose title or content contains `filter`, ignoring case.
    /// An empty filter matches everything. Recomputed on every call.
    pub fn list<'a>(&'a self, filter: &str) -> impl Iterator<Item = (&'a str, &'a Note)> + 'a {
        let query = filter.to_lowercase();
        self.iter()
            .filter(move |(title, note)| matches(&query, title, note))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

fn matches(query: &str, title: &str, note: &Note) -> bool {
    query.is_empty()
        || title.to_lowercase().contains(query)
        || note.content.to_lowercase().contains(query)
}
