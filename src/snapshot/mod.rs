// src/snapshot/mod.rs
//! Snapshot generation module
//!
//! Writes a human-readable markdown view of the notebook: an index with every
//! note card and the link graph as a mermaid block, one file per note, and the
//! raw graph description. The snapshot is derived and rebuilt from scratch.

pub mod utils;

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::entity::Note;
use crate::notebook::Notebook;
use crate::render::render_cards;
use crate::storage::KeyValueStore;
use crate::Result;

pub use self::utils::{format_date, format_timestamp, slugify};

/// Statistics about generated snapshot
#[derive(Debug, Default)]
pub struct SnapshotStats {
    pub notes: usize,
    pub links: usize,
    pub files_generated: Vec<String>,
}

#[derive(Serialize)]
struct NoteFrontmatter {
    title: String,
    created: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<String>,
}

/// Generate the markdown snapshot for a notebook
///
/// This will:
/// 1. Clear the existing snapshot directory
/// 2. Write one markdown file per note under `notes/`
/// 3. Write `graph.mmd` with the graph description
/// 4. Generate an index README.md
pub fn generate_snapshot<S: KeyValueStore>(notebook: &Notebook<S>, snapshot_dir: &Path) -> Result<SnapshotStats> {
    let mut stats = SnapshotStats::default();

    utils::clear_snapshot_dir(snapshot_dir)?;

    let mut used_slugs = HashSet::new();
    for (title, note) in notebook.notes().iter() {
        let filename = unique_filename(&slugify(title), &mut used_slugs);
        let relative_path = format!("notes/{}", filename);
        utils::write_snapshot_file(&snapshot_dir.join(&relative_path), &note_file(title, note)?)?;
        stats.notes += 1;
        stats.files_generated.push(relative_path);
    }

    let description = notebook.graph_description();
    utils::write_snapshot_file(&snapshot_dir.join("graph.mmd"), &description)?;
    stats.files_generated.push("graph.mmd".to_string());
    stats.links = notebook.links().len();

    let mut readme = String::from("# Notebook\n\n");
    readme.push_str(&format!("{} notes, {} links\n\n## Notes\n\n", stats.notes, stats.links));
    for card in render_cards(notebook.notes(), "") {
        readme.push_str(&card.to_markdown());
        readme.push('\n');
    }
    readme.push_str(&format!("## Graph\n\n```mermaid\n{}\n```\n\n", description));
    readme.push_str(&format!("_Last updated: {}_\n", current_timestamp()));
    utils::write_snapshot_file(&snapshot_dir.join("README.md"), &readme)?;
    stats.files_generated.push("README.md".to_string());

    Ok(stats)
}

fn note_file(title: &str, note: &Note) -> Result<String> {
    let frontmatter = NoteFrontmatter {
        title: title.to_string(),
        created: format_timestamp(&note.created_at),
        tags: note.tags.clone(),
        attachments: note.attachments.clone(),
    };
    Ok(format!("{}\n{}\n", yaml_frontmatter(&frontmatter)?, note.content))
}

/// Generate a unique filename, handling collisions
fn unique_filename(base_slug: &str, used_slugs: &mut HashSet<String>) -> String {
    let mut candidate = base_slug.to_string();
    let mut n = 2;
    while !used_slugs.insert(candidate.clone()) {
        candidate = format!("{}-{}", base_slug, n);
        n += 1;
    }
    format!("{}.md", candidate)
}

/// Generate YAML frontmatter block
pub fn yaml_frontmatter<T: Serialize>(data: &T) -> Result<String> {
    let yaml = serde_yaml::to_string(data)
        .map_err(|e| crate::error::MindnotesError::Storage(format!("YAML serialization failed: {}", e)))?;
    Ok(format!("---\n{}---\n", yaml))
}

/// Get current timestamp for "last updated" footers
pub fn current_timestamp() -> String {
    format_timestamp(&Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::NoteDraft;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    async fn sample() -> Notebook<MemoryStore> {
        let mut nb = Notebook::open(MemoryStore::new()).unwrap();
        nb.save_note(NoteDraft::new("My Idea", "Explore graph rendering", "design, graphs"))
            .await
            .unwrap();
        nb.save_note(NoteDraft::new("my idea!", "", "")).await.unwrap();
        nb.add_link("My Idea", "my idea!").await.unwrap();
        nb
    }

    #[test]
    fn test_yaml_frontmatter_format() {
        #[derive(serde::Serialize)]
        struct TestFrontmatter {
            title: String,
        }

        let result = yaml_frontmatter(&TestFrontmatter { title: "Test".to_string() }).unwrap();
        assert!(result.starts_with("---\n"));
        assert!(result.ends_with("---\n"));
        assert!(result.contains("title: Test"));
    }

    #[test]
    fn test_unique_filename_handles_collisions() {
        let mut used = HashSet::new();
        assert_eq!(unique_filename("idea", &mut used), "idea.md");
        assert_eq!(unique_filename("idea", &mut used), "idea-2.md");
        assert_eq!(unique_filename("idea", &mut used), "idea-3.md");
    }

    #[tokio::test]
    async fn test_generate_snapshot_writes_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("snapshot");
        let nb = sample().await;

        let stats = generate_snapshot(&nb, &dir).unwrap();

        assert_eq!(stats.notes, 2);
        assert_eq!(stats.links, 1);
        assert!(dir.join("notes/my-idea.md").exists());
        assert!(dir.join("notes/my-idea-2.md").exists());

        let graph = std::fs::read_to_string(dir.join("graph.mmd")).unwrap();
        assert_eq!(graph, nb.graph_description());

        let readme = std::fs::read_to_string(dir.join("README.md")).unwrap();
        assert!(readme.contains("### My Idea"));
        assert!(readme.contains("_design, graphs_"));
        assert!(readme.contains("```mermaid\ngraph TD"));

        let note = std::fs::read_to_string(dir.join("notes/my-idea.md")).unwrap();
        assert!(note.contains("title: My Idea"));
        assert!(note.ends_with("Explore graph rendering\n"));
    }

    #[tokio::test]
    async fn test_generate_snapshot_clears_existing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("snapshot");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stale.md"), "old content").unwrap();

        generate_snapshot(&sample().await, &dir).unwrap();

        assert!(!dir.join("stale.md").exists());
        assert!(dir.join("README.md").exists());
    }
}
