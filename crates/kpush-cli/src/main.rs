//! kpush CLI
//!
//! Pushes local directories into Kubernetes containers, once or
//! continuously.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use kpush_core::Settings;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let settings = Settings::new(cli.home.as_deref())
        .with_config_path(cli.config.as_deref())
        .with_interval_ms(cli.interval)
        .with_window(cli.time.clone())
        .with_filters(cli.command.jobs())
        .with_strict(cli.strict);
    tracing::debug!(?settings, "Resolved settings");

    execute_command(cli.command, settings)
}

fn execute_command(cmd: Commands, settings: Settings) -> Result<()> {
    match cmd {
        Commands::Push { .. } => commands::run_push(settings),
        Commands::PushAll { .. } => commands::run_push_all(settings),
        Commands::Test { .. } => commands::run_test(settings),
        Commands::Watch { .. } => commands::run_watch(settings),
        Commands::Touch { .. } => commands::run_touch(settings),
        Commands::Reset { .. } => commands::run_reset(settings),
        Commands::Status { .. } => commands::run_status(settings),
    }
}
