use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MindnotesError, Result};

pub const CONFIG_FILE: &str = "config.yaml";

/// Project configuration stored in `.mindnotes/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub graph: GraphConfig,
}

/// Remote mirror settings. Remote sync is off until `enabled` is set and the
/// Firebase project fields are filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    /// Document collection notes are upserted into
    pub collection: String,
    /// Top-level folder for uploaded blobs
    pub blob_root: String,
    pub auth_url: String,
    pub firestore_url: String,
    pub storage_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            project_id: None,
            storage_bucket: None,
            collection: "notes".to_string(),
            blob_root: "notebooks".to_string(),
            auth_url: "https://identitytoolkit.googleapis.com".to_string(),
            firestore_url: "https://firestore.googleapis.com".to_string(),
            storage_url: "https://firebasestorage.googleapis.com".to_string(),
        }
    }
}

/// Which diagram renderer turns graph descriptions into SVG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// "mermaid-cli" or "none"
    pub renderer: String,
    /// Executable used by the mermaid-cli renderer
    pub command: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            renderer: "mermaid-cli".to_string(),
            command: "mmdc".to_string(),
        }
    }
}

impl GraphConfig {
    pub fn is_enabled(&self) -> bool {
        self.renderer != "none"
    }
}

impl Config {
    /// Read the config from a project directory, falling back to defaults
    /// when the file does not exist.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| MindnotesError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write the config into a project directory.
    pub fn save(&self, project_dir: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| MindnotesError::Config(format!("YAML serialization failed: {}", e)))?;
        fs::write(project_dir.join(CONFIG_FILE), yaml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.remote.enabled);
        assert_eq!(config.remote.collection, "notes");
        assert_eq!(config.remote.blob_root, "notebooks");
        assert!(config.graph.is_enabled());
        assert_eq!(config.graph.command, "mmdc");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(Config::load(tmp.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "remote:\n  enabled: true\n  project_id: demo\ngraph:\n  renderer: none\n",
        )
        .unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert!(config.remote.enabled);
        assert_eq!(config.remote.project_id.as_deref(), Some("demo"));
        assert_eq!(config.remote.collection, "notes");
        assert!(!config.graph.is_enabled());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.remote.api_key = Some("key".to_string());
        config.save(tmp.path()).unwrap();

        assert_eq!(Config::load(tmp.path()).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "remote: [unclosed").unwrap();
        assert!(matches!(Config::load(tmp.path()), Err(MindnotesError::Config(_))));
    }
}
