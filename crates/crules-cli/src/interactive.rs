//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal confirmation.

use colored::Colorize;
use dialoguer::Confirm;

use crules_core::diff::{REVIEW_LINE_LIMIT, line_diff};
use crules_core::{ChangeSet, PushReviewer};

use crate::commands::print_diff_lines;
use crate::error::Result;

/// Asks on the terminal before a push writes to the mirror.
pub struct TerminalReviewer;

impl PushReviewer for TerminalReviewer {
    fn review(&mut self, changes: &ChangeSet) -> crules_core::Result<bool> {
        print_change_list(changes);

        let show = confirm("Show diffs?", false).map_err(prompt_error)?;
        if show {
            print_review_diffs(changes);
        }

        confirm("Push these changes?", true).map_err(prompt_error)
    }
}

/// Ask before deleting a profile.
pub fn confirm_delete(alias: &str) -> Result<bool> {
    Ok(confirm(&format!("Delete profile '{}'?", alias), false)?)
}

fn confirm(prompt: &str, default: bool) -> std::result::Result<bool, dialoguer::Error> {
    Confirm::new().with_prompt(prompt).default(default).interact()
}

fn prompt_error(e: dialoguer::Error) -> crules_core::Error {
    std::io::Error::other(format!("Interactive prompt error: {}", e)).into()
}

/// Files in each category, one per line.
pub fn print_change_list(changes: &ChangeSet) {
    println!("{}", "Changes:".bold());
    for path in changes.added.keys() {
        println!("  {} {}", "+".green(), path);
    }
    for path in changes.modified.keys() {
        println!("  {} {}", "~".yellow(), path);
    }
    for path in changes.deleted.keys() {
        println!("  {} {}", "-".red(), path);
    }
    println!();
}

fn print_review_diffs(changes: &ChangeSet) {
    for (path, modification) in &changes.modified {
        println!("{}", format!("--- {}", path).cyan());
        let lines = line_diff(
            &String::from_utf8_lossy(&modification.reference),
            &String::from_utf8_lossy(&modification.subject),
            false,
        );
        print_diff_lines(&lines, Some(REVIEW_LINE_LIMIT));
        println!();
    }
    for path in changes.added.keys() {
        println!("{} {}", "new file:".green(), path);
    }
    for path in changes.deleted.keys() {
        println!("{} {}", "deleted:".red(), path);
    }
    println!();
}
