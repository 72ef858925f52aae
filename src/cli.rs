use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "postmgr", version, about = "Terminal client for a remote post collection")]
pub struct Cli {
    /// Server base URL, e.g. http://localhost:3500
    #[arg(long, global = true, env = "POSTMGR_SERVER")]
    pub server: Option<String>,

    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true, env = "POSTMGR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error, off)
    #[arg(long, global = true, env = "POSTMGR_LOG")]
    pub log_level: Option<String>,

    /// File to append logs to
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all posts
    List,
    /// Create a new post
    Add {
        /// Title of the post
        title: String,
        /// Optional description
        #[arg(long, short = 'd', default_value = "")]
        description: String,
    },
    /// Edit an existing post; omitted fields keep their current value
    Edit {
        /// Post id to edit
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
    /// Delete a post
    Delete {
        /// Post id to delete
        id: String,
    },
    /// Search posts by title
    Search {
        /// Title filter (may be empty)
        #[arg(default_value = "")]
        query: String,
    },
    /// Launch the interactive TUI
    Tui,
}
