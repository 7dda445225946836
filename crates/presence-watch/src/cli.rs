use std::path::PathBuf;

use clap::Parser;

/// presence-watch: follow a Discord account's live presence in the terminal.
#[derive(Parser, Debug)]
#[command(name = "presence-watch", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Discord user id to watch (overrides `subject.id`).
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Log filter directive override (e.g. `presence=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Fetch once, print, and exit.
    #[arg(long)]
    pub once: bool,

    /// Print snapshots as JSON instead of summary lines.
    #[arg(long)]
    pub json: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
