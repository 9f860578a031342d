//! Push command implementation

use colored::Colorize;

use crules_core::{AcceptAll, PushOptions, PushOutcome, PushReviewer};
use crules_git::PushRecovery;

use super::print_refresh_warning;
use crate::context::Context;
use crate::error::Result;
use crate::interactive::{TerminalReviewer, print_change_list};

/// Run the push command
pub fn run_push(ctx: &Context, dry_run: bool, force: bool) -> Result<()> {
    let profile = ctx.workspace.active_profile();
    println!(
        "{} Pushing rules to {} ({})",
        "=>".blue().bold(),
        profile.repository.cyan(),
        profile.alias.dimmed()
    );

    let mut reviewer: Box<dyn PushReviewer> = if force {
        Box::new(AcceptAll)
    } else {
        Box::new(TerminalReviewer)
    };
    let report = ctx
        .workspace
        .push(&PushOptions { dry_run, force }, reviewer.as_mut())?;
    print_refresh_warning(&report.refresh);

    match report.outcome {
        PushOutcome::NothingToDo => {
            println!("{} No changes to push.", "OK".green().bold());
        }
        PushOutcome::DryRun => {
            println!("{}", "[DRY RUN] No changes were made.".yellow());
            println!("   Would push: {}", report.changes.summary());
            print_change_list(&report.changes);
        }
        PushOutcome::Cancelled => {
            println!("{}", "Push cancelled.".yellow());
        }
        PushOutcome::AlreadyInRepository => {
            println!(
                "{} The repository already contains these changes.",
                "OK".green().bold()
            );
        }
        PushOutcome::Pushed { message, recovery } => {
            match recovery {
                PushRecovery::Direct => {}
                PushRecovery::SetUpstream => {
                    println!("   {}", "Published the branch upstream.".dimmed());
                }
                PushRecovery::Rebased => {
                    println!("   {}", "Rebased onto newer remote changes.".dimmed());
                }
            }
            println!(
                "{} Pushed {} ({})",
                "OK".green().bold(),
                report.changes.summary(),
                message.dimmed()
            );
        }
    }
    Ok(())
}
