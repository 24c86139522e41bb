//! Mermaid graph description and rendering.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::RenderError;
use crate::repository::{LinkRepository, NoteRepository};

/// Node identifier for a title: each run of whitespace becomes one underscore.
pub fn safe_id(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    let mut in_space = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('_');
            }
            in_space = true;
        } else {
            id.push(c);
            in_space = false;
        }
    }

    id
}

/// `graph TD` description: one node per note, then one edge per link.
pub fn describe(notes: &NoteRepository, links: &LinkRepository) -> String {
    let mut lines = vec!["graph TD".to_string()];

    for title in notes.titles() {
        lines.push(format!("  {}[\"{}\"]", safe_id(title), title));
    }

    for link in links.iter() {
        lines.push(format!("  {} --> {}", safe_id(&link.source), safe_id(&link.target)));
    }

    lines.join("\n")
}

/// Turns a graph description into SVG markup.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, description: &str) -> Result<String, RenderError>;
}

/// Renders through the mermaid-cli executable (`mmdc`).
pub struct MermaidCli {
    command: String,
}

impl MermaidCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl DiagramRenderer for MermaidCli {
    async fn render(&self, description: &str) -> Result<String, RenderError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("graph.mmd");
        let output = dir.path().join("graph.svg");
        tokio::fs::write(&input, description).await?;

        let result = Command::new(&self.command)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-q")
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::Unavailable(format!("{}: {}", self.command, e)));
            }
            Err(e) => return Err(e.into()),
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(RenderError::Failed(if stderr.is_empty() {
                format!("{} exited with {}", self.command, out.status)
            } else {
                stderr
            }));
        }

        Ok(tokio::fs::read_to_string(&output).await?)
    }
}

/// What the graph region currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GraphDisplay {
    #[default]
    Empty,
    /// Rendered markup
    Svg(String),
    /// No renderer configured; the raw description is shown as-is
    Description(String),
    /// Rendering failed; the description is shown for debugging
    Fallback(String),
}

impl GraphDisplay {
    pub fn text(&self) -> &str {
        match self {
            GraphDisplay::Empty => "",
            GraphDisplay::Svg(s) | GraphDisplay::Description(s) | GraphDisplay::Fallback(s) => s,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GraphDisplay::Fallback(_))
    }
}

/// Wraps an optional diagram renderer and never fails: render errors are
/// logged and become the fallback display.
#[derive(Default)]
pub struct GraphRenderer {
    renderer: Option<Box<dyn DiagramRenderer>>,
}

impl GraphRenderer {
    pub fn new(renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            renderer: Some(renderer),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub async fn render(&self, description: String) -> GraphDisplay {
        let Some(renderer) = &self.renderer else {
            return GraphDisplay::Description(description);
        };

        match renderer.render(&description).await {
            Ok(svg) => {
                debug!(bytes = svg.len(), "graph rendered");
                GraphDisplay::Svg(svg)
            }
            Err(e) => {
                error!(error = %e, "mermaid rendering error");
                GraphDisplay::Fallback(format!("Mermaid Error:\n{}", description))
            }
        }
    }
}
