use clap::Parser;
use mindnotes::cli::{
    handle_add, handle_get, handle_graph, handle_init, handle_link, handle_links, handle_list,
    handle_remote_log, handle_search, handle_snapshot, handle_titles, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("MINDNOTES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add {
            title,
            content,
            tags,
            attachments,
            stdin,
            json,
        } => handle_add(title, content, tags, attachments, stdin, json).await,
        Commands::List { json } => handle_list(json).await,
        Commands::Search { query, json } => handle_search(query, json).await,
        Commands::Get { title, json } => handle_get(title, json).await,
        Commands::Link { source, target } => handle_link(source, target).await,
        Commands::Links { json } => handle_links(json).await,
        Commands::Titles => handle_titles().await,
        Commands::Graph { raw, output } => handle_graph(raw, output).await,
        Commands::Snapshot => handle_snapshot().await,
        Commands::RemoteLog { json } => handle_remote_log(json).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
