use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::config::{Config, RemoteConfig};
use crate::entity::{Note, NoteDraft};
use crate::error::{MindnotesError, Result, ValidationError};
use crate::notebook::Notebook;
use crate::remote::{FirebaseRemote, RemoteSync};
use crate::render::{EndpointChoices, GraphDisplay, GraphRenderer, MermaidCli, NoteCard};
use crate::repository::LinkOutcome;
use crate::snapshot::{format_date, generate_snapshot};
use crate::storage::{LoroStore, MINDNOTES_DIR};

#[derive(Serialize)]
struct NoteJson<'a> {
    title: &'a str,
    #[serde(flatten)]
    note: &'a Note,
}

/// Find the project root by looking for .mindnotes/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(MINDNOTES_DIR).exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

/// Open the notebook, optionally wiring in the remote mirror and the
/// configured diagram renderer.
async fn open_notebook(remote: bool, graph: bool) -> Result<Notebook<LoroStore>> {
    let root = find_project_root();
    let store = LoroStore::open(&root)?;
    let config = Config::load(store.project_dir()?)?;
    let mut notebook = Notebook::open(store)?;

    if remote {
        if let Some(sync) = connect_remote(&config.remote).await {
            notebook = notebook.with_remote(sync);
        }
    }

    if graph && config.graph.is_enabled() {
        let renderer = MermaidCli::new(config.graph.command.clone());
        notebook = notebook.with_graph_renderer(GraphRenderer::new(Box::new(renderer)));
    }

    Ok(notebook)
}

async fn connect_remote(config: &RemoteConfig) -> Option<RemoteSync> {
    if !config.enabled {
        return None;
    }

    match FirebaseRemote::new(config) {
        Ok(firebase) => {
            let firebase = Arc::new(firebase);
            Some(RemoteSync::connect(firebase.clone(), firebase.clone(), firebase, &config.blob_root).await)
        }
        Err(e) => {
            warn!(error = %e, "remote sync enabled but unusable, continuing locally");
            None
        }
    }
}

fn print_cards(cards: &[NoteCard]) {
    let bold = atty::is(atty::Stream::Stdout);
    for card in cards {
        let text = card.to_string();
        match text.split_once('\n') {
            Some((title, rest)) if bold => print!("\x1b[1m{}\x1b[0m\n{}", title, rest),
            _ => print!("{}", text),
        }
        println!();
    }
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let store = LoroStore::init(&root)?;
    Config::default().save(store.project_dir()?)?;

    println!("Initialized mindnotes project in {}", root.display());

    Ok(())
}

pub async fn handle_add(
    title: String,
    content: Option<String>,
    tags: String,
    attachments: Vec<PathBuf>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let content = if stdin || (content.is_none() && !atty::is(atty::Stream::Stdin)) {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        content.unwrap_or_default()
    };

    if let Some(missing) = attachments.iter().find(|p| !p.is_file()) {
        return Err(ValidationError::MissingAttachment(missing.display().to_string()).into());
    }

    let mut notebook = open_notebook(true, false).await?;

    let mut draft = NoteDraft::new(title, content, tags);
    draft.attachments = attachments;
    let outcome = notebook.save_note(draft).await?;

    if json {
        let out = NoteJson {
            title: &outcome.title,
            note: &outcome.note,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let verb = if outcome.replaced { "Updated" } else { "Saved" };
        println!("{} note '{}'", verb, outcome.title);
        if !outcome.note.attachments.is_empty() {
            println!("  attachments: {}", outcome.note.attachments.join(" | "));
        }
    }

    Ok(())
}

pub async fn handle_list(json: bool) -> Result<()> {
    handle_search(String::new(), json).await
}

pub async fn handle_search(query: String, json: bool) -> Result<()> {
    let mut notebook = open_notebook(false, false).await?;

    if json {
        let matches: Vec<NoteJson> = notebook
            .list_notes(&query)
            .map(|(title, note)| NoteJson { title, note })
            .collect();
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    let cards = notebook.search(&query);
    if cards.is_empty() {
        if query.is_empty() {
            println!("No notes found.");
        } else {
            println!("No notes match '{}'.", query);
        }
    } else {
        print_cards(cards);
    }

    Ok(())
}

pub async fn handle_get(title: String, json: bool) -> Result<()> {
    let notebook = open_notebook(false, false).await?;

    let note = notebook
        .notes()
        .get(&title)
        .ok_or_else(|| MindnotesError::NoteNotFound(title.clone()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&NoteJson { title: &title, note })?);
    } else {
        println!("Title: {}", title);
        println!("Created: {}", format_date(&note.created_at));
        if !note.tags.is_empty() {
            println!("Tags: {}", note.tags.join(", "));
        }
        for url in &note.attachments {
            println!("Attachment: {}", url);
        }
        if !note.content.is_empty() {
            println!("\n{}", note.content);
        }
    }

    Ok(())
}

pub async fn handle_link(source: String, target: String) -> Result<()> {
    let mut notebook = open_notebook(false, false).await?;

    // Endpoints are picked from the populated titles, never typed freely.
    let choices = EndpointChoices::populate(notebook.notes());
    if !choices.is_source(&source) {
        return Err(ValidationError::UnknownNote(source).into());
    }
    if !choices.is_target(&target) {
        return Err(ValidationError::UnknownNote(target).into());
    }

    match notebook.add_link(&source, &target).await? {
        LinkOutcome::Added => println!("Linked '{}' -> '{}'", source, target),
        LinkOutcome::Duplicate => println!("Link '{}' -> '{}' already exists", source, target),
    }

    Ok(())
}

pub async fn handle_links(json: bool) -> Result<()> {
    let notebook = open_notebook(false, false).await?;
    let links: Vec<_> = notebook.links().iter().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else if links.is_empty() {
        println!("No links found.");
    } else {
        for link in links {
            println!("  {} -> {}", link.source, link.target);
        }
    }

    Ok(())
}

pub async fn handle_titles() -> Result<()> {
    let notebook = open_notebook(false, false).await?;

    for title in EndpointChoices::populate(notebook.notes()).sources {
        println!("{}", title);
    }

    Ok(())
}

pub async fn handle_graph(raw: bool, output: Option<PathBuf>) -> Result<()> {
    let mut notebook = open_notebook(false, !raw).await?;

    if raw {
        println!("{}", notebook.graph_description());
        return Ok(());
    }

    match notebook.render_graph().await {
        GraphDisplay::Svg(svg) => match output {
            Some(path) => {
                fs::write(&path, svg)?;
                println!("Wrote graph to {}", path.display());
            }
            None => println!("{}", svg),
        },
        // Failures were already logged; the fallback text is the visible result.
        display => println!("{}", display.text()),
    }

    Ok(())
}

pub async fn handle_snapshot() -> Result<()> {
    let notebook = open_notebook(false, false).await?;
    let snapshot_dir = notebook.store().project_dir()?.join("snapshot");

    let stats = generate_snapshot(&notebook, &snapshot_dir)?;

    println!(
        "Snapshot written to {} ({} notes, {} links, {} files)",
        snapshot_dir.display(),
        stats.notes,
        stats.links,
        stats.files_generated.len()
    );

    Ok(())
}

pub async fn handle_remote_log(json: bool) -> Result<()> {
    let notebook = open_notebook(true, false).await?;
    let docs = notebook.log_remote().await;

    if json {
        let out: Vec<_> = docs
            .iter()
            .map(|(id, data)| serde_json::json!({ "id": id, "data": data }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Fetched {} remote notes", docs.len());
    }

    Ok(())
}
