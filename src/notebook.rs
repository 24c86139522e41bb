//! Application context and command interface.
//!
//! A `Notebook` owns the local store, both repositories, the optional remote
//! mirror and the current display state. Each user action is one method.
//! Local writes happen before any await and are authoritative; the remote
//! mirror is advisory and its failures are only logged and reported.

use tracing::{debug, info, warn};

use crate::entity::{Note, NoteDraft};
use crate::error::{MindnotesError, Result};
use crate::remote::{NotePayload, RemoteSync};
use crate::render::{
    describe, render_cards, EndpointChoices, GraphDisplay, GraphRenderer, NoteCard,
};
use crate::repository::{LinkOutcome, LinkRepository, NoteRepository};
use crate::storage::KeyValueStore;

/// Everything currently shown to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Display {
    pub filter: String,
    pub cards: Vec<NoteCard>,
    pub choices: EndpointChoices,
    pub graph: GraphDisplay,
}

/// How the remote mirror fared for one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Disabled,
    Synced,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub title: String,
    pub note: Note,
    /// True when an existing note with this title was overwritten
    pub replaced: bool,
    pub remote: RemoteStatus,
}

pub struct Notebook<S: KeyValueStore> {
    store: S,
    notes: NoteRepository,
    links: LinkRepository,
    remote: Option<RemoteSync>,
    graph: GraphRenderer,
    display: Display,
}

impl<S: KeyValueStore> Notebook<S> {
    /// Load both repositories from the store. Remote sync and graph
    /// rendering start disabled.
    pub fn open(store: S) -> Result<Self> {
        let notes = NoteRepository::load(&store)?;
        let links = LinkRepository::load(&store)?;
        debug!(notes = notes.len(), links = links.len(), "notebook loaded");

        Ok(Self {
            store,
            notes,
            links,
            remote: None,
            graph: GraphRenderer::disabled(),
            display: Display::default(),
        })
    }

    pub fn with_remote(mut self, remote: RemoteSync) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_graph_renderer(mut self, graph: GraphRenderer) -> Self {
        self.graph = graph;
        self
    }

    pub fn notes(&self) -> &NoteRepository {
        &self.notes
    }

    pub fn links(&self) -> &LinkRepository {
        &self.links
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Notes matching `filter`; see [`NoteRepository::list`].
    pub fn list_notes<'a>(&'a self, filter: &str) -> impl Iterator<Item = (&'a str, &'a Note)> + 'a {
        self.notes.list(filter)
    }

    pub fn graph_description(&self) -> String {
        describe(&self.notes, &self.links)
    }

    /// Validate and store a note, then mirror it remotely and refresh the
    /// display.
    ///
    /// A blank title fails with a validation error and changes nothing. A
    /// remote failure does not undo the local save; it is reported in
    /// [`SaveOutcome::remote`].
    pub async fn save_note(&mut self, draft: NoteDraft) -> Result<SaveOutcome> {
        let (title, note, files) = draft.into_note()?;

        let replaced = self.notes.upsert(title.clone(), note).is_some();
        self.notes.persist(&mut self.store)?;
        info!(%title, replaced, "note saved");

        let remote = self.mirror(&title, &files).await;

        // The note is already stored, so the display follows it even if
        // persisting the attachment URLs failed.
        self.refresh().await;
        let remote = remote?;

        let note = self
            .notes
            .get(&title)
            .cloned()
            .ok_or_else(|| MindnotesError::NoteNotFound(title.clone()))?;

        Ok(SaveOutcome {
            title,
            note,
            replaced,
            remote,
        })
    }

    async fn mirror(&mut self, title: &str, files: &[std::path::PathBuf]) -> Result<RemoteStatus> {
        let Some(remote) = &self.remote else {
            return Ok(RemoteStatus::Disabled);
        };
        let Some(note) = self.notes.get_mut(title) else {
            return Err(MindnotesError::NoteNotFound(title.to_string()));
        };

        let result = remote.mirror(title, note, files).await;

        // URLs gathered before a failure are kept, so persist whatever arrived.
        if !note.attachments.is_empty() {
            self.notes.persist(&mut self.store)?;
        }

        Ok(match result {
            Ok(()) => {
                info!(%title, "note mirrored to remote store");
                RemoteStatus::Synced
            }
            Err(e) => {
                warn!(%title, error = %e, "remote sync failed");
                RemoteStatus::Failed(e.to_string())
            }
        })
    }

    /// Add a directed link. Linking a note to itself is a validation error;
    /// an existing pair is a no-op.
    pub async fn add_link(&mut self, source: &str, target: &str) -> Result<LinkOutcome> {
        let outcome = self.links.add(source, target)?;

        if outcome == LinkOutcome::Added {
            self.links.persist(&mut self.store)?;
            info!(source, target, "link added");
            self.display.choices = EndpointChoices::populate(&self.notes);
            self.render_graph().await;
        }

        Ok(outcome)
    }

    /// Rebuild the cards for `filter`.
    pub fn search(&mut self, filter: &str) -> &[NoteCard] {
        self.display.filter = filter.to_string();
        self.display.cards = render_cards(&self.notes, filter);
        &self.display.cards
    }

    /// Rebuild cards (unfiltered), endpoint choices and the graph.
    pub async fn refresh(&mut self) {
        self.search("");
        self.display.choices = EndpointChoices::populate(&self.notes);
        self.render_graph().await;
    }

    /// Render the graph for the current state into the display.
    ///
    /// Holding `&mut self` across the render keeps a second render from
    /// writing the display region concurrently.
    pub async fn render_graph(&mut self) -> &GraphDisplay {
        let description = describe(&self.notes, &self.links);
        self.display.graph = self.graph.render(description).await;
        &self.display.graph
    }

    /// Fetch and log every remote document. Empty when remote sync is off
    /// or the fetch fails.
    pub async fn log_remote(&self) -> Vec<(String, NotePayload)> {
        match &self.remote {
            Some(remote) => remote.log_all().await,
            None => {
                debug!("remote sync disabled, nothing to fetch");
                Vec::new()
            }
        }
    }
}
