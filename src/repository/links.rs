use tracing::debug;

use crate::entity::Link;
use crate::error::{Result, ValidationError};
use crate::storage::KeyValueStore;

/// What `LinkRepository::add` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Added,
    /// The exact pair was already stored; nothing changed
    Duplicate,
}

/// Directed links in the order they were added.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LinkRepository {
    links: Vec<Link>,
}

impl LinkRepository {
    pub const STORAGE_KEY: &'static str = "links";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the local store. A missing entry yields an empty list.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let links = match store.get_item(Self::STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self { links })
    }

    /// Rewrite the whole list to the local store.
    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let raw = serde_json::to_string(&self.links)?;
        store.set_item(Self::STORAGE_KEY, &raw)
    }

    /// Append `source → target` unless it links a note to itself or the
    /// exact pair already exists.
    pub fn add(&mut self, source: &str, target: &str) -> std::result::Result<LinkOutcome, ValidationError> {
        let link = Link::new(source, target);
        if link.is_self_link() {
            return Err(ValidationError::SelfLink);
        }
        if self.links.contains(&link) {
            debug!(source, target, "link already present");
            return Ok(LinkOutcome::Duplicate);
        }
        self.links.push(link);
        Ok(LinkOutcome::Added)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
