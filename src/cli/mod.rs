mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_add, handle_get, handle_graph, handle_init, handle_link, handle_links, handle_list,
    handle_remote_log, handle_search, handle_snapshot, handle_titles,
};
