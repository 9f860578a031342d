//! Status command implementation

use colored::Colorize;

use super::print_refresh_warning;
use crate::context::Context;
use crate::error::Result;

/// Run the status command
pub fn run_status(ctx: &Context) -> Result<()> {
    let profile = ctx.workspace.active_profile();
    let report = ctx.workspace.status()?;
    print_refresh_warning(&report.refresh);

    println!("{}", "Rules Status".bold());
    println!("  {:<12} {}", "Profile:".dimmed(), profile.alias.cyan());
    println!("  {:<12} {}", "Repository:".dimmed(), profile.repository);
    println!("  {:<12} {}", "Cache:".dimmed(), report.mirror_dir.display());
    println!();

    let changes = &report.changes;
    if changes.is_empty() {
        println!("{} Rules are up to date.", "OK".green().bold());
        return Ok(());
    }

    if !changes.added.is_empty() {
        println!("{}", "New in project:".green());
        for path in changes.added.keys() {
            println!("  {} {}", "+".green(), path);
        }
    }
    if !changes.modified.is_empty() {
        println!("{}", "Modified:".yellow());
        for path in changes.modified.keys() {
            println!("  {} {}", "~".yellow(), path);
        }
    }
    if !changes.deleted.is_empty() {
        println!("{}", "Only in repository:".red());
        for path in changes.deleted.keys() {
            println!("  {} {}", "-".red(), path);
        }
    }

    println!();
    println!(
        "{} {} unchanged. Run {} to publish or {} to discard.",
        changes.summary(),
        changes.unchanged.len(),
        "crules push".cyan(),
        "crules sync".cyan()
    );
    Ok(())
}
