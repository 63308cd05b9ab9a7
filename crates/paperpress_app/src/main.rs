//! `paperpress` renders Markdown posts into sanitized, highlighted HTML and
//! keeps them in a small file-backed store with trending and related-post
//! queries.

mod cli;
mod commands;
mod config;
mod logging;
mod persist;
mod store;

use std::io;

use anyhow::Context;
use clap::Parser;
use paperpress_logging::press_debug;

use crate::cli::Cli;
use crate::commands::App;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    logging::initialize(&config.logging);
    press_debug!("Configuration: {:?}", config);

    let app = App::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.run(cli.command, &mut out)
}
