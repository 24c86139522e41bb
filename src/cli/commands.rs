use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mindnotes")]
#[command(version, about = "A local-first notebook with a linked note graph")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new notebook in the current directory
    Init,

    /// Save a note, overwriting any note with the same title
    Add {
        /// Note title
        title: String,

        /// Note content
        #[arg(long, short = 'c')]
        content: Option<String>,

        /// Comma-separated tags, e.g. "design, graphs"
        #[arg(long, short = 't', default_value = "")]
        tags: String,

        /// File to upload as an attachment (can be specified multiple times)
        #[arg(long = "attach", short = 'a', value_name = "FILE")]
        attachments: Vec<PathBuf>,

        /// Read content from stdin
        #[arg(long, conflicts_with = "content")]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every note as a card
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show notes whose title or content contains the query (case-insensitive)
    Search {
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single note by title
    Get {
        title: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Link one note to another
    Link {
        /// Source note title
        source: String,

        /// Target note title
        target: String,
    },

    /// List links
    Links {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the titles available as link endpoints
    Titles,

    /// Render the link graph
    Graph {
        /// Print the mermaid description instead of rendering it
        #[arg(long)]
        raw: bool,

        /// Write the rendered SVG to this file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write a markdown snapshot to .mindnotes/snapshot
    Snapshot,

    /// Fetch and log every note in the remote store
    RemoteLog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
