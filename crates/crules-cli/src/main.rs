//! crules CLI
//!
//! Keeps a project's `.cursor` rules in step with a shared git repository.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        for suggestion in e.suggestions() {
            eprintln!("  {} {}", "hint:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Only fails if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(cli.home)?;
    tracing::debug!(cwd = %ctx.workspace.cwd().display(), "Starting");

    match cli.command {
        Commands::Sync { dry_run } => commands::run_sync(&ctx, dry_run),
        Commands::Push { dry_run, force } => commands::run_push(&ctx, dry_run, force),
        Commands::Status => commands::run_status(&ctx),
        Commands::Diff { path } => commands::run_diff(&ctx, &path, cli.verbose),
        Commands::Config { action } => commands::run_config(&ctx, action),
    }
}
