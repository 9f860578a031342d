//! Sync command implementation

use colored::Colorize;

use crules_core::SyncOptions;

use super::print_refresh_warning;
use crate::context::Context;
use crate::error::Result;

/// Run the sync command
///
/// Replaces the working tree's `.cursor` with the mirrored one, keeping
/// protected files.
pub fn run_sync(ctx: &Context, dry_run: bool) -> Result<()> {
    let profile = ctx.workspace.active_profile();
    println!(
        "{} Syncing rules from {} ({})",
        "=>".blue().bold(),
        profile.repository.cyan(),
        profile.alias.dimmed()
    );

    let report = ctx.workspace.sync(&SyncOptions { dry_run })?;
    print_refresh_warning(&report.refresh);
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    if report.dry_run {
        println!("{}", "[DRY RUN] No changes were made.".yellow());
        println!(
            "   Would copy {} files from {}",
            report.copied,
            report.source.display()
        );
        println!(
            "   Would preserve {} protected files in {}",
            report.preserved,
            report.target.display()
        );
        return Ok(());
    }

    println!(
        "{} Copied {} files, preserved {} protected files.",
        "OK".green().bold(),
        report.copied,
        report.preserved
    );
    Ok(())
}
