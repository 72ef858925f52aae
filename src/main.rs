mod api;
mod cli;
mod commands;
mod config;
mod logging;
mod manager;
mod model;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let settings = config::load_settings(
        args.config.as_deref(),
        config::Overrides {
            server: args.server,
            log_level: args.log_level,
            log_file: args.log_file,
        },
    )?;
    logging::init(&settings)?;
    tracing::debug!(server = %settings.server, "starting");

    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::List => commands::list(&settings),
        cli::Command::Add { title, description } => commands::add(&settings, title, description),
        cli::Command::Edit {
            id,
            title,
            description,
        } => commands::edit(&settings, id, title, description),
        cli::Command::Delete { id } => commands::delete(&settings, id),
        cli::Command::Search { query } => commands::search(&settings, query),
        cli::Command::Tui => commands::tui(&settings),
    }
}
