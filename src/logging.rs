use crate::config::Settings;
use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Output goes to the log file because the
/// terminal belongs to the TUI; without a usable path logging is disabled.
pub fn init(settings: &Settings) -> Result<()> {
    let filter = build_filter(&settings.log_level)?;
    let Some(path) = settings.log_file.as_ref() else {
        return fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"));
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {:?}", path))?;

    fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    let directive: LevelFilter = level
        .parse()
        .with_context(|| format!("invalid log level {:?}", level))?;
    Ok(EnvFilter::builder()
        .with_default_directive(directive.into())
        .from_env_lossy())
}
