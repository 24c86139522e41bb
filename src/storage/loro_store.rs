use std::fs;
use std::path::{Path, PathBuf};

use loro::{LoroDoc, LoroValue, ValueOrContainer};

use super::KeyValueStore;
use crate::error::{MindnotesError, Result};

pub const MINDNOTES_DIR: &str = ".mindnotes";
const LORO_DB: &str = "loro.db";
const ROOT_MAP: &str = "local_storage";

/// File-backed store: a loro document snapshot under `.mindnotes/loro.db`.
pub struct LoroStore {
    doc: LoroDoc,
    path: PathBuf,
}

impl LoroStore {
    /// Initialize a new mindnotes project
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(MINDNOTES_DIR);

        if dir.exists() {
            return Err(MindnotesError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;

        let store = Self {
            doc: LoroDoc::new(),
            path: dir.join(LORO_DB),
        };
        store.save()?;

        Ok(store)
    }

    /// Open an existing mindnotes project
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(MINDNOTES_DIR).join(LORO_DB);

        if !path.exists() {
            return Err(MindnotesError::NotInitialized);
        }

        let bytes = fs::read(&path)?;
        let doc = LoroDoc::new();
        doc.import(&bytes)?;

        Ok(Self { doc, path })
    }

    /// Write the document snapshot to disk
    pub fn save(&self) -> Result<()> {
        let bytes = self.doc.export(loro::ExportMode::Snapshot)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// The `.mindnotes` directory this store lives in
    pub fn project_dir(&self) -> Result<&Path> {
        self.path
            .parent()
            .ok_or_else(|| MindnotesError::Storage(format!("{} has no parent", self.path.display())))
    }
}

impl KeyValueStore for LoroStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let map = self.doc.get_map(ROOT_MAP);
        match map.get(key) {
            Some(ValueOrContainer::Value(LoroValue::String(s))) => Ok(Some(s.to_string())),
            Some(_) => Err(MindnotesError::Storage(format!(
                "entry '{}' is not a string",
                key
            ))),
            None => Ok(None),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let map = self.doc.get_map(ROOT_MAP);
        map.insert(key, value.to_string())?;
        self.doc.commit();
        self.save()
    }
}
