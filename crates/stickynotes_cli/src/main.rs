//! `stickynotes` command-line entry point.
//!
//! # Responsibility
//! - Load config, start file logging and open the notes database.
//! - Run one subcommand, then report store notices on stderr.
//!
//! Exit status is non-zero when the command fails or the store queued an
//! error notice (e.g. a save that could not be written).

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use log::info;
use std::io;
use std::process::ExitCode;
use stickynotes_core::{
    init_logging, open_sqlite_store, AppConfig, Notice, StubSyncProvider, SyncProvider,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let log_dir = std::path::absolute(config.log_dir()).context("failed to resolve log directory")?;
    init_logging(level, &log_dir).context("failed to start logging")?;

    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path());
    let mut store = open_sqlite_store(&db_path, &config.storage_key, config.store_options())
        .with_context(|| format!("failed to open notes database `{}`", db_path.display()))?;
    info!(
        "event=cli_start module=cli status=ok version={} notes={}",
        stickynotes_core::core_version(),
        store.len()
    );

    let mut sync = StubSyncProvider::new();
    if let Some(sync_config) = config.sync.clone() {
        sync.enable(sync_config)?;
    }

    let outcome = cli::handlers::dispatch(&cli.command, &mut store, &sync, &mut io::stdout().lock());
    store.flush_all_edits();

    let notices = store.drain_notices();
    report_notices(&notices);
    outcome?;

    if notices.iter().any(Notice::is_error) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn report_notices(notices: &[Notice]) {
    for notice in notices {
        if notice.is_error() {
            eprintln!("warning: {notice}");
        } else {
            eprintln!("{notice}");
        }
    }
}
