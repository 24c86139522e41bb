//! Pull-based projections of repository state. Every call recomputes its
//! output from scratch.

mod cards;
mod choices;
mod graph;

pub use cards::{render_cards, NoteCard, PREVIEW_CHARS};
pub use choices::EndpointChoices;
pub use graph::{describe, safe_id, DiagramRenderer, GraphDisplay, GraphRenderer, MermaidCli};
