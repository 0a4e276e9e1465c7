mod cli;
mod commands;
mod config;
mod progress;
mod ui;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::ConfigFile;
use gotoolchain::Updater;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let command = cli.command.unwrap_or(Command::Update);
    if let Command::Completions { shell } = command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "updatego", &mut io::stdout());
        return Ok(());
    }

    let config = ConfigFile::load(cli.config.as_deref())?.resolve(cli.overrides);
    let mut updater = Updater::new(config).context("Cannot update Go on this host")?;
    if cli.dry_run {
        updater = updater.dry_run();
    }

    let result = match command {
        Command::Update => commands::update::run(&ctx, &updater),
        Command::Check => commands::check::run(&ctx, &updater),
        Command::Releases { all } => commands::releases::run(&ctx, &updater, all),
        Command::Platforms { release } => {
            commands::platforms::run(&ctx, &updater, release.as_deref())
        }
        Command::Completions { .. } => Ok(()),
    };

    if let Err(e) = &result {
        if let Some(err) = e.downcast_ref::<gotoolchain::Error>() {
            let category = err.category();
            ui::error(&format!("{}. {}.", category.description(), category.advice()));
        }
    }
    result
}
