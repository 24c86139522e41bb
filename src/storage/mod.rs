//! Local Store Adapter.
//!
//! A whole-value key/value store. Repositories read their entry once at
//! startup and rewrite it in full after every mutation.

mod loro_store;
mod memory;

pub use loro_store::{LoroStore, MINDNOTES_DIR};
pub use memory::MemoryStore;

use crate::error::Result;

pub trait KeyValueStore {
    /// Read the entry stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the entry stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}
